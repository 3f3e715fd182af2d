//! Raster images and their conversion to/from clustering samples.

/// Image decoding, downscaling and still-frame encoding.
pub mod decode;
/// Raster <-> normalized sample conversion.
pub mod samples;

use crate::foundation::error::{ChromaError, ChromaResult};

/// An RGBA8 raster, straight alpha, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer of exactly `width * height * 4` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> ChromaResult<Self> {
        let expected = rgba_len(width, height)?;
        if data.len() != expected {
            return Err(ChromaError::render(format!(
                "raster buffer has {} bytes, expected {expected} for {width}x{height} rgba8",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A raster where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> ChromaResult<Self> {
        let len = rgba_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / 4 {
            data.extend_from_slice(&rgba);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// Borrow the RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the RGBA8 bytes; the length cannot change.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGBA of the pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Give up ownership of the RGBA8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

fn rgba_len(width: u32, height: u32) -> ChromaResult<usize> {
    if width == 0 || height == 0 {
        return Err(ChromaError::invalid_config(format!(
            "raster dimensions must be positive, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| ChromaError::invalid_config("raster dimensions overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
