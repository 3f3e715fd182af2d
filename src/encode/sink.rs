use crate::encode::profile::EncodingProfile;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;

/// Configuration provided to a [`VideoEncoder`] at the start of an encode.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frame rate.
    pub fps: Fps,
    /// Container/codec chosen for this encode.
    pub profile: EncodingProfile,
    /// Target video bitrate in bits per second.
    pub bitrate_bps: u32,
}

/// Encoder contract for turning a frame sequence into one video blob.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order between
/// one `begin` and the matching `finish`. An encode that cannot complete is closed with `abort`
/// instead of `finish`.
pub trait VideoEncoder {
    /// Whether this encoder can produce `profile`.
    fn supports(&mut self, profile: &EncodingProfile) -> bool;
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: EncodeConfig) -> ChromaResult<()>;
    /// Push one frame in strictly increasing order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ChromaResult<()>;
    /// Flush the encoder and return the encoded bytes.
    fn finish(&mut self) -> ChromaResult<Vec<u8>>;
    /// Abandon an encode started with `begin`; the encoder can begin again afterwards.
    fn abort(&mut self) {}
}

impl<E: VideoEncoder + ?Sized> VideoEncoder for &mut E {
    fn supports(&mut self, profile: &EncodingProfile) -> bool {
        (**self).supports(profile)
    }

    fn begin(&mut self, cfg: EncodeConfig) -> ChromaResult<()> {
        (**self).begin(cfg)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ChromaResult<()> {
        (**self).push_frame(idx, frame)
    }

    fn finish(&mut self) -> ChromaResult<Vec<u8>> {
        (**self).finish()
    }

    fn abort(&mut self) {
        (**self).abort()
    }
}

/// In-memory encoder for tests and headless hosts.
///
/// "Encodes" by concatenating raw RGBA frames, so the output length is
/// `frame_count * width * height * 4`.
#[derive(Debug)]
pub struct InMemoryEncoder {
    supported: Option<Vec<EncodingProfile>>,
    discard_output: bool,
    started: bool,
    cfg: Option<EncodeConfig>,
    frames: Vec<(FrameIndex, RasterImage)>,
}

impl Default for InMemoryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEncoder {
    /// Encoder supporting every profile.
    pub fn new() -> Self {
        Self {
            supported: None,
            discard_output: false,
            started: false,
            cfg: None,
            frames: Vec::new(),
        }
    }

    /// Encoder that only reports support for `profiles`.
    pub fn supporting(profiles: impl IntoIterator<Item = EncodingProfile>) -> Self {
        Self {
            supported: Some(profiles.into_iter().collect()),
            ..Self::new()
        }
    }

    /// Encoder whose `finish` returns zero bytes.
    pub fn discarding() -> Self {
        Self {
            discard_output: true,
            ..Self::new()
        }
    }

    /// `true` between `begin` and the matching `finish` or `abort`.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The configuration captured in the last `begin`, if any.
    pub fn config(&self) -> Option<&EncodeConfig> {
        self.cfg.as_ref()
    }

    /// Frames received since the last `begin`.
    pub fn frames(&self) -> &[(FrameIndex, RasterImage)] {
        &self.frames
    }
}

impl VideoEncoder for InMemoryEncoder {
    fn supports(&mut self, profile: &EncodingProfile) -> bool {
        match &self.supported {
            Some(list) => list.contains(profile),
            None => true,
        }
    }

    fn begin(&mut self, cfg: EncodeConfig) -> ChromaResult<()> {
        if self.started {
            return Err(ChromaError::render("in-memory encoder already started"));
        }
        self.started = true;
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &RasterImage) -> ChromaResult<()> {
        let cfg = match &self.cfg {
            Some(cfg) if self.started => cfg,
            _ => return Err(ChromaError::render("in-memory encoder not started")),
        };
        if let Some((last, _)) = self.frames.last()
            && idx.0 <= last.0
        {
            return Err(ChromaError::render(
                "in-memory encoder received out-of-order frame index",
            ));
        }
        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(ChromaError::render(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn finish(&mut self) -> ChromaResult<Vec<u8>> {
        if !self.started {
            return Err(ChromaError::render("in-memory encoder not started"));
        }
        self.started = false;
        if self.discard_output {
            return Ok(Vec::new());
        }
        Ok(self
            .frames
            .iter()
            .flat_map(|(_, f)| f.data().iter().copied())
            .collect())
    }

    fn abort(&mut self) {
        self.started = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
