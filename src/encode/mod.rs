//! Video assembly.
//!
//! Encoders consume rendered frames in order; [`assemble::assemble`] negotiates a profile and
//! drives one encode.

/// Frame sequence to video orchestration.
pub mod assemble;
/// `ffmpeg`-based encoder (system binary, piped I/O).
pub mod ffmpeg;
/// Container/codec profiles.
pub mod profile;
/// Encoder trait and built-in in-memory encoder.
pub mod sink;
