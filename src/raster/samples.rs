use crate::foundation::error::{ChromaError, ChromaResult};
use crate::foundation::math::{unit_to_unorm8, unorm8_to_unit};
use crate::raster::RasterImage;

/// Normalized RGB samples (one row per pixel, channels in `[0, 1]`).
///
/// Built once per run and shared read-only by every cluster level. Alpha is not part of the
/// clustering space.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleMatrix {
    width: u32,
    height: u32,
    rows: Vec<[f32; 3]>,
}

impl SampleMatrix {
    /// Convert an RGBA8 raster, dividing each color channel by 255 and dropping alpha.
    pub fn from_raster(raster: &RasterImage) -> Self {
        let rows = raster
            .data()
            .chunks_exact(4)
            .map(|px| {
                [
                    unorm8_to_unit(px[0]),
                    unorm8_to_unit(px[1]),
                    unorm8_to_unit(px[2]),
                ]
            })
            .collect();
        Self {
            width: raster.width(),
            height: raster.height(),
            rows,
        }
    }

    /// Build a matrix from explicit rows laid out as a `width x height` grid.
    pub fn from_rows(width: u32, height: u32, rows: Vec<[f32; 3]>) -> ChromaResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChromaError::invalid_config(
                "sample matrix dimensions must be positive",
            ));
        }
        if rows.len() != width as usize * height as usize {
            return Err(ChromaError::invalid_config(format!(
                "sample matrix has {} rows, expected {}",
                rows.len(),
                width as usize * height as usize
            )));
        }
        Ok(Self {
            width,
            height,
            rows,
        })
    }

    /// Source width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Source height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always `false` for a validated matrix.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow all rows.
    pub fn rows(&self) -> &[[f32; 3]] {
        &self.rows
    }

    /// Arithmetic mean of all rows.
    pub fn mean(&self) -> [f32; 3] {
        let mut sum = [0.0f64; 3];
        for r in &self.rows {
            sum[0] += f64::from(r[0]);
            sum[1] += f64::from(r[1]);
            sum[2] += f64::from(r[2]);
        }
        let n = self.rows.len().max(1) as f64;
        [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ]
    }
}

/// Reconstruct a raster from cluster assignments: every pixel takes its centroid color, alpha 255.
pub fn from_assignment(
    assignments: &[u32],
    centroids: &[[f32; 3]],
    width: u32,
    height: u32,
) -> ChromaResult<RasterImage> {
    let mut out = RasterImage::filled(width, height, [0, 0, 0, 255])?;
    if assignments.len() != out.pixel_count() {
        return Err(ChromaError::render(format!(
            "assignment count {} does not match {width}x{height} pixels",
            assignments.len()
        )));
    }
    paint_assignment_range(out.data_mut(), assignments, centroids, 0..assignments.len())?;
    Ok(out)
}

/// Paint pixels `range` of an RGBA8 buffer from their centroid colors.
///
/// Used directly by the frame renderer to process the raster in chunks.
pub(crate) fn paint_assignment_range(
    rgba: &mut [u8],
    assignments: &[u32],
    centroids: &[[f32; 3]],
    range: std::ops::Range<usize>,
) -> ChromaResult<()> {
    if range.end > assignments.len() || range.end * 4 > rgba.len() {
        return Err(ChromaError::render(format!(
            "pixel range {}..{} exceeds buffer of {} pixels",
            range.start,
            range.end,
            assignments.len().min(rgba.len() / 4)
        )));
    }

    let palette: Vec<[u8; 3]> = centroids
        .iter()
        .map(|c| {
            [
                unit_to_unorm8(c[0]),
                unit_to_unorm8(c[1]),
                unit_to_unorm8(c[2]),
            ]
        })
        .collect();

    let start = range.start;
    let px = rgba[start * 4..range.end * 4].chunks_exact_mut(4);
    for (d, &label) in px.zip(&assignments[range]) {
        let color = palette.get(label as usize).ok_or_else(|| {
            ChromaError::render(format!(
                "assignment {label} out of range for {} centroids",
                palette.len()
            ))
        })?;
        d[0] = color[0];
        d[1] = color[1];
        d[2] = color[2];
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/samples.rs"]
mod tests;
