//! Reconstruction of quantized frames.

/// Frame renderer and the rendered frame type.
pub mod frame;
