use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::ImageEncoder as _;

use crate::foundation::error::{ChromaError, ChromaResult};
use crate::raster::RasterImage;

/// Decode any format supported by `image` into an RGBA8 raster.
pub fn decode_image(bytes: &[u8]) -> ChromaResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterImage::new(width, height, rgba.into_raw())
}

/// Read and decode an image file.
pub fn load_image(path: impl AsRef<Path>) -> ChromaResult<RasterImage> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

/// Downsample so the longest side is at most `max_dimension`, keeping the aspect ratio.
///
/// Scaled dimensions are floored (minimum 1). Images already within bounds are returned as-is;
/// this never upscales.
pub fn fit_within(raster: RasterImage, max_dimension: u32) -> ChromaResult<RasterImage> {
    if max_dimension == 0 {
        return Err(ChromaError::invalid_config("max_dimension must be positive"));
    }
    let (w, h) = (raster.width(), raster.height());
    let longest = w.max(h);
    if longest <= max_dimension {
        return Ok(raster);
    }

    let scaled = |side: u32| {
        let v = u64::from(side) * u64::from(max_dimension) / u64::from(longest);
        (v as u32).max(1)
    };
    let (nw, nh) = (scaled(w), scaled(h));

    let src = image::RgbaImage::from_raw(w, h, raster.into_raw())
        .ok_or_else(|| ChromaError::render("raster buffer does not match its dimensions"))?;
    let resized = image::imageops::resize(&src, nw, nh, image::imageops::FilterType::Triangle);
    tracing::debug!(from_w = w, from_h = h, to_w = nw, to_h = nh, "downscaled source image");
    RasterImage::new(nw, nh, resized.into_raw())
}

/// Encode a raster as PNG bytes (the still-image representation of a frame).
pub fn encode_png(raster: &RasterImage) -> ChromaResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new(Cursor::new(&mut buf))
        .write_image(
            raster.data(),
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| ChromaError::render(format!("png encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
