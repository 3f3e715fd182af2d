use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::cluster::kmeans::KMeansOpts;
use crate::encode::assemble::AssembleOpts;
use crate::foundation::error::{ChromaError, ChromaResult};

/// Options controlling a whole [`RunSession`](crate::session::run_session::RunSession).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunOpts {
    /// K-means engine options, shared by every level.
    pub kmeans: KMeansOpts,
    /// Pixels painted between cooperative checkpoints while rendering a frame.
    pub render_chunk_size: usize,
    /// How long each frame is shown in the video.
    pub frame_interval_ms: u32,
    /// Downscale sources so their longest side fits; `None` keeps full resolution.
    pub max_dimension: Option<u32>,
    /// Seed for k-means++ seeding. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Video profile preferences and bitrate.
    pub encoding: AssembleOpts,
    /// Largest accepted step count.
    pub max_steps: u32,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            kmeans: KMeansOpts::default(),
            render_chunk_size: 100_000,
            frame_interval_ms: 100,
            max_dimension: Some(1200),
            seed: None,
            encoding: AssembleOpts::default(),
            max_steps: 100,
        }
    }
}

impl RunOpts {
    /// Parse options from JSON. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> ChromaResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ChromaError::serde(format!("parse run options JSON: {e}")))
    }

    /// Parse options from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ChromaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ChromaError::serde(format!("open run options JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject values that would make a run meaningless.
    pub fn validate(&self) -> ChromaResult<()> {
        self.kmeans.validate()?;
        if self.render_chunk_size == 0 {
            return Err(ChromaError::invalid_config("render_chunk_size must be >= 1"));
        }
        if self.frame_interval_ms == 0 {
            return Err(ChromaError::invalid_config("frame_interval_ms must be >= 1"));
        }
        if self.max_dimension == Some(0) {
            return Err(ChromaError::invalid_config("max_dimension must be >= 1 when set"));
        }
        if self.encoding.bitrate_bps == 0 {
            return Err(ChromaError::invalid_config("encoding.bitrate_bps must be >= 1"));
        }
        if self.encoding.preferences.is_empty() {
            return Err(ChromaError::invalid_config(
                "encoding.preferences must name at least one profile",
            ));
        }
        if self.max_steps < 2 {
            return Err(ChromaError::invalid_config("max_steps must be >= 2"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
