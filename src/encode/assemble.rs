use std::path::Path;

use anyhow::Context as _;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::profile::{DEFAULT_BITRATE_BPS, EncodingProfile};
use crate::encode::sink::{EncodeConfig, VideoEncoder};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;
use crate::session::cooperative::Cooperative;

/// Options for [`assemble`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssembleOpts {
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u32,
    /// Profiles to try, most preferred first. The first one the encoder supports wins.
    pub preferences: Vec<EncodingProfile>,
}

impl Default for AssembleOpts {
    fn default() -> Self {
        Self {
            bitrate_bps: DEFAULT_BITRATE_BPS,
            preferences: EncodingProfile::default_preferences(),
        }
    }
}

/// An encoded video together with the parameters it was produced with.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoArtifact {
    /// Encoded container bytes.
    pub bytes: Vec<u8>,
    /// Profile negotiated with the encoder.
    pub profile: EncodingProfile,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of encoded frames.
    pub frame_count: usize,
    /// Display time of each frame.
    pub frame_interval_ms: u32,
}

impl VideoArtifact {
    /// MIME type of `bytes`.
    pub fn mime_type(&self) -> String {
        self.profile.mime_type()
    }

    /// Playback length in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.frame_count as u64 * u64::from(self.frame_interval_ms)
    }

    /// Write the video to `path`, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> ChromaResult<()> {
        let path = path.as_ref();
        ensure_parent_dir(path)?;
        std::fs::write(path, &self.bytes)
            .with_context(|| format!("write video '{}'", path.display()))?;
        Ok(())
    }
}

/// Pick the first profile in `preferences` that `encoder` supports.
pub fn negotiate_profile<E: VideoEncoder + ?Sized>(
    encoder: &mut E,
    preferences: &[EncodingProfile],
) -> ChromaResult<EncodingProfile> {
    preferences
        .iter()
        .copied()
        .find(|p| encoder.supports(p))
        .ok_or_else(|| {
            let tried: Vec<String> = preferences.iter().map(|p| p.mime_type()).collect();
            ChromaError::unsupported(format!("no supported profile among [{}]", tried.join(", ")))
        })
}

/// Encode `frames` in order, each shown for `frame_interval_ms`, into a single video.
///
/// All frames must share the dimensions of the first. The scheduler is polled after every frame.
/// If pushing, cancellation or `finish` fails after `begin`, the encoder is aborted so it can be
/// used again.
#[tracing::instrument(skip(frames, encoder, opts, coop), fields(frame_count = frames.len()))]
pub fn assemble<E: VideoEncoder + ?Sized>(
    frames: &[&RasterImage],
    frame_interval_ms: u32,
    encoder: &mut E,
    opts: &AssembleOpts,
    coop: &mut Cooperative<'_>,
) -> ChromaResult<VideoArtifact> {
    let Some(first) = frames.first() else {
        return Err(ChromaError::invalid_config("cannot assemble a video from zero frames"));
    };
    let fps = Fps::from_interval_ms(frame_interval_ms)?;
    if opts.bitrate_bps == 0 {
        return Err(ChromaError::invalid_config("bitrate must be non-zero"));
    }
    let (width, height) = (first.width(), first.height());
    if let Some(bad) = frames
        .iter()
        .find(|f| f.width() != width || f.height() != height)
    {
        return Err(ChromaError::render(format!(
            "frame is {}x{} but the sequence is {width}x{height}",
            bad.width(),
            bad.height()
        )));
    }

    let profile = negotiate_profile(encoder, &opts.preferences)?;
    tracing::info!(profile = %profile, width, height, fps = fps.as_f64(), "encoding video");

    encoder.begin(EncodeConfig {
        width,
        height,
        fps,
        profile,
        bitrate_bps: opts.bitrate_bps,
    })?;
    let bytes = match encode_frames(frames, encoder, coop) {
        Ok(bytes) => bytes,
        Err(err) => {
            // Leave the encoder ready for the next run.
            encoder.abort();
            return Err(err);
        }
    };
    if bytes.is_empty() {
        return Err(ChromaError::EmptyEncodeResult);
    }

    Ok(VideoArtifact {
        bytes,
        profile,
        width,
        height,
        frame_count: frames.len(),
        frame_interval_ms,
    })
}

fn encode_frames<E: VideoEncoder + ?Sized>(
    frames: &[&RasterImage],
    encoder: &mut E,
    coop: &mut Cooperative<'_>,
) -> ChromaResult<Vec<u8>> {
    for (i, frame) in frames.iter().enumerate() {
        encoder.push_frame(FrameIndex(i as u64), frame)?;
        coop.checkpoint()?;
    }
    encoder.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/assemble.rs"]
mod tests;
