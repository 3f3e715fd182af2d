use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cluster::kmeans::KMeans;
use crate::cluster::levels::cluster_levels;
use crate::encode::assemble::{VideoArtifact, assemble};
use crate::encode::sink::VideoEncoder;
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;
use crate::raster::decode::fit_within;
use crate::raster::samples::SampleMatrix;
use crate::render::frame::{Frame, FrameRenderer};
use crate::session::cooperative::Cooperative;
use crate::session::opts::RunOpts;

/// Per-level progress notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Cluster count of the level just rendered.
    pub k: u32,
    /// One-based index of that level.
    pub step: u32,
    /// Number of levels in the run.
    pub total: u32,
}

/// Everything a successful run produces.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// One still per level, in increasing-k order.
    pub frames: Vec<Frame>,
    /// The frames assembled into a video.
    pub video: VideoArtifact,
}

/// A run that stopped part-way. `frames` holds the stills rendered before the failure.
#[derive(thiserror::Error, Debug)]
#[error("run failed after {} frame(s)", .frames.len())]
pub struct RunFailure {
    /// What stopped the run.
    #[source]
    pub error: ChromaError,
    /// Stills completed before the failure, in level order.
    pub frames: Vec<Frame>,
}

impl RunFailure {
    fn bare(error: ChromaError) -> Self {
        Self {
            error,
            frames: Vec::new(),
        }
    }

    /// Drop the partial frames and keep the error.
    pub fn into_error(self) -> ChromaError {
        self.error
    }
}

/// One source image and one step count, turned into a sequence of quantized frames.
///
/// Construction does all validation, so a session that exists can only fail for runtime reasons
/// (cancellation, rendering, encoding).
#[derive(Debug)]
pub struct RunSession {
    samples: SampleMatrix,
    levels: Vec<u32>,
    opts: RunOpts,
}

impl RunSession {
    /// Validate inputs, downscale the source and derive its sample matrix and level schedule.
    ///
    /// Levels above the (downscaled) pixel count are clamped to it, since k-means cannot produce
    /// more clusters than it has samples.
    #[tracing::instrument(
        skip(source, opts),
        fields(width = source.width(), height = source.height())
    )]
    pub fn new(source: &RasterImage, steps: u32, opts: RunOpts) -> ChromaResult<Self> {
        opts.validate()?;
        if steps > opts.max_steps {
            return Err(ChromaError::invalid_config(format!(
                "steps must be within [2, {}], got {steps}",
                opts.max_steps
            )));
        }
        let mut levels = cluster_levels(steps)?;

        let samples = match opts.max_dimension {
            Some(max) => SampleMatrix::from_raster(&fit_within(source.clone(), max)?),
            None => SampleMatrix::from_raster(source),
        };

        let n = u32::try_from(samples.len()).unwrap_or(u32::MAX);
        if levels.iter().any(|&k| k > n) {
            tracing::warn!(pixels = n, "image has fewer pixels than some levels; clamping k");
            let mut clamped: Vec<u32> = Vec::with_capacity(levels.len());
            for k in levels {
                let k = k.min(n);
                if !clamped.contains(&k) {
                    clamped.push(k);
                }
            }
            levels = clamped;
        }

        tracing::info!(steps, levels = ?levels, "run session ready");
        Ok(Self {
            samples,
            levels,
            opts,
        })
    }

    /// Cluster counts this session will render, strictly increasing.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// Width of the frames this session renders (after downscaling).
    pub fn width(&self) -> u32 {
        self.samples.width()
    }

    /// Height of the frames this session renders (after downscaling).
    pub fn height(&self) -> u32 {
        self.samples.height()
    }

    /// Options this session was built with.
    pub fn opts(&self) -> &RunOpts {
        &self.opts
    }

    /// Render one frame per level, in order, without encoding a video.
    #[tracing::instrument(skip_all, fields(levels = self.levels.len()))]
    pub fn render_frames(
        &self,
        coop: &mut Cooperative<'_>,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<Vec<Frame>, RunFailure> {
        let engine = KMeans::new(self.opts.kmeans.clone()).map_err(RunFailure::bare)?;
        let renderer =
            FrameRenderer::new(self.opts.render_chunk_size).map_err(RunFailure::bare)?;
        let mut rng = match self.opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let total = self.levels.len() as u32;
        let mut frames = Vec::with_capacity(self.levels.len());
        for (i, &k) in self.levels.iter().enumerate() {
            let step = i as u32 + 1;
            let res = engine
                .run(&self.samples, k, &mut rng, coop)
                .and_then(|state| {
                    renderer.render(&state, self.width(), self.height(), step, coop)
                });
            match res {
                Ok(frame) => {
                    tracing::debug!(k, step, total, "level rendered");
                    frames.push(frame);
                    progress(Progress { k, step, total });
                }
                Err(error) => {
                    tracing::warn!(k, step, %error, "run stopped");
                    return Err(RunFailure { error, frames });
                }
            }
            // Between levels; a completed still is kept even if this cancels.
            if let Err(error) = coop.checkpoint() {
                tracing::warn!(k, step, %error, "run stopped between levels");
                return Err(RunFailure { error, frames });
            }
        }
        Ok(frames)
    }

    /// Render every level, then assemble the frames into a video with `encoder`.
    pub fn run<E: VideoEncoder + ?Sized>(
        self,
        encoder: &mut E,
        coop: &mut Cooperative<'_>,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<RunOutput, RunFailure> {
        let frames = self.render_frames(coop, progress)?;
        let rasters: Vec<&RasterImage> = frames.iter().map(|f| &f.raster).collect();
        let video = assemble(
            &rasters,
            self.opts.frame_interval_ms,
            encoder,
            &self.opts.encoding,
            coop,
        );
        match video {
            Ok(video) => Ok(RunOutput { frames, video }),
            Err(error) => {
                tracing::warn!(%error, "video assembly failed");
                Err(RunFailure { error, frames })
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/run_session.rs"]
mod tests;
