use crate::foundation::error::{ChromaError, ChromaResult};
use crate::foundation::math::gcd_u32;

/// 0-based position of a frame in the output sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated, reduced rational frame rate.
    pub fn new(num: u32, den: u32) -> ChromaResult<Self> {
        if num == 0 || den == 0 {
            return Err(ChromaError::invalid_config(
                "fps numerator and denominator must be non-zero",
            ));
        }
        let g = gcd_u32(num, den);
        Ok(Self {
            num: num / g,
            den: den / g,
        })
    }

    /// Frame rate at which every frame is shown for exactly `interval_ms` milliseconds.
    pub fn from_interval_ms(interval_ms: u32) -> ChromaResult<Self> {
        if interval_ms == 0 {
            return Err(ChromaError::invalid_config(
                "frame interval must be at least 1 ms",
            ));
        }
        Self::new(1000, interval_ms)
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of `frames` frames, in milliseconds.
    pub fn frames_to_ms(self, frames: u64) -> f64 {
        (frames as f64) * 1000.0 * f64::from(self.den) / f64::from(self.num)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
