use crate::cluster::kmeans::KMeansState;
use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;
use crate::raster::decode::encode_png;
use crate::raster::samples::paint_assignment_range;
use crate::session::cooperative::Cooperative;

/// One rendered cluster level: the quantized raster plus its PNG still.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Cluster count this frame was rendered with.
    pub k: u32,
    /// One-based position of the level within its run.
    pub step: u32,
    /// Reconstructed raster (alpha always 255).
    pub raster: RasterImage,
    /// PNG encoding of `raster`, for display and download.
    pub png: Vec<u8>,
}

impl Frame {
    /// Human-facing label, e.g. `"8 clusters"`.
    pub fn label(&self) -> String {
        format!("{} clusters", self.k)
    }

    /// Stable file name for writing the still to disk.
    pub fn file_name(&self) -> String {
        format!("level_{:02}_k{:02}.png", self.step, self.k)
    }
}

/// Turns a [`KMeansState`] back into pixels.
#[derive(Clone, Copy, Debug)]
pub struct FrameRenderer {
    chunk_size: usize,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self { chunk_size: 100_000 }
    }
}

impl FrameRenderer {
    /// Renderer painting `chunk_size` pixels between cooperative checkpoints.
    pub fn new(chunk_size: usize) -> ChromaResult<Self> {
        if chunk_size == 0 {
            return Err(ChromaError::invalid_config(
                "render chunk_size must be >= 1",
            ));
        }
        Ok(Self { chunk_size })
    }

    /// Paint every pixel with its centroid color and encode the still.
    ///
    /// `state` is only read.
    pub fn render(
        &self,
        state: &KMeansState,
        width: u32,
        height: u32,
        step: u32,
        coop: &mut Cooperative<'_>,
    ) -> ChromaResult<Frame> {
        let mut raster = RasterImage::filled(width, height, [0, 0, 0, 255])?;
        let assignments = state.assignments();
        let n = raster.pixel_count();
        if assignments.len() != n {
            return Err(ChromaError::render(format!(
                "state has {} assignments for a {width}x{height} frame",
                assignments.len()
            )));
        }

        let mut start = 0usize;
        while start < n {
            let end = (start + self.chunk_size).min(n);
            paint_assignment_range(raster.data_mut(), assignments, state.centroids(), start..end)?;
            coop.checkpoint()?;
            start = end;
        }

        let png = encode_png(&raster)?;
        Ok(Frame {
            k: state.k() as u32,
            step,
            raster,
            png,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
