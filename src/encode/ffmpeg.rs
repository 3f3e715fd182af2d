use crate::encode::profile::{Container, EncodingProfile};
use crate::encode::sink::{EncodeConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

type Drain = JoinHandle<std::io::Result<Vec<u8>>>;

/// Encoder that spawns the system `ffmpeg`, streams raw RGBA frames to its stdin and collects
/// the muxed video from its stdout.
#[derive(Default)]
pub struct FfmpegEncoder {
    encoders: Option<String>,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stdout_drain: Option<Drain>,
    stderr_drain: Option<Drain>,

    cfg: Option<EncodeConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegEncoder {
    /// Create an encoder; `ffmpeg` is not probed until first use.
    pub fn new() -> Self {
        Self::default()
    }

    fn encoder_list(&mut self) -> &str {
        self.encoders.get_or_insert_with(|| {
            Command::new("ffmpeg")
                .args(["-hide_banner", "-encoders"])
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output()
                .ok()
                .filter(|o| o.status.success())
                .map(|o| String::from_utf8_lossy(&o.stdout).into_owned())
                .unwrap_or_default()
        })
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn supports(&mut self, profile: &EncodingProfile) -> bool {
        let name = profile.ffmpeg_encoder();
        self.encoder_list()
            .lines()
            .any(|line| line.split_whitespace().nth(1) == Some(name))
    }

    fn begin(&mut self, cfg: EncodeConfig) -> ChromaResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ChromaError::invalid_config(
                "ffmpeg encoder width/height must be non-zero",
            ));
        }
        if cfg.bitrate_bps == 0 {
            return Err(ChromaError::invalid_config("bitrate must be non-zero"));
        }
        if self.child.is_some() {
            return Err(ChromaError::render("ffmpeg encoder already started"));
        }
        if !is_ffmpeg_on_path() {
            return Err(ChromaError::unsupported(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        cmd.args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0", "-an"]);

        // yuv420p needs even dimensions.
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            cmd.args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2"]);
        }
        cmd.args([
            "-c:v",
            cfg.profile.ffmpeg_encoder(),
            "-pix_fmt",
            "yuv420p",
            "-b:v",
            &cfg.bitrate_bps.to_string(),
        ]);
        push_fps(&mut cmd, cfg.fps);
        if cfg.profile.container == Container::Mp4 {
            // Non-seekable output needs a fragmented mp4.
            cmd.args(["-movflags", "frag_keyframe+empty_moov+default_base_moof"]);
        }
        cmd.args(["-f", cfg.profile.ffmpeg_muxer(), "pipe:1"]);

        tracing::debug!(
            profile = %cfg.profile,
            width = cfg.width,
            height = cfg.height,
            "spawning ffmpeg"
        );
        let mut child = cmd.spawn().map_err(|e| {
            ChromaError::Other(anyhow::anyhow!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ChromaError::render("failed to open ffmpeg stdin (unexpected)"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ChromaError::render("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ChromaError::render("failed to open ffmpeg stderr (unexpected)"))?;

        self.stdout_drain = Some(spawn_drain(stdout));
        self.stderr_drain = Some(spawn_drain(stderr));
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ChromaResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ChromaError::render("ffmpeg encoder not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ChromaError::render(
                "ffmpeg encoder received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(ChromaError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ChromaError::render("ffmpeg encoder is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(frame.data()).map_err(|e| {
            ChromaError::Other(anyhow::anyhow!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn finish(&mut self) -> ChromaResult<Vec<u8>> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ChromaError::render("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            ChromaError::Other(anyhow::anyhow!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stdout_bytes = join_drain(self.stdout_drain.take(), "stdout")?;
        let stderr_bytes = join_drain(self.stderr_drain.take(), "stderr")?;
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ChromaError::Other(anyhow::anyhow!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(stdout_bytes)
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            tracing::debug!("killing ffmpeg after an abandoned encode");
            let _ = child.kill();
            let _ = child.wait();
        }
        // Both pipes close once the child is gone, so the drains end.
        let _ = join_drain(self.stdout_drain.take(), "stdout");
        let _ = join_drain(self.stderr_drain.take(), "stderr");
        self.cfg = None;
        self.last_idx = None;
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        self.abort();
    }
}

fn push_fps(cmd: &mut Command, fps: Fps) {
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn spawn_drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(handle: Option<Drain>, what: &str) -> ChromaResult<Vec<u8>> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| ChromaError::render(format!("ffmpeg {what} drain thread panicked")))?
                .map_err(|e| {
                    ChromaError::Other(anyhow::anyhow!("ffmpeg {what} read failed: {e}"))
                })?;
            Ok(bytes)
        }
        None => Ok(Vec::new()),
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ChromaResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
