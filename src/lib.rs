//! chromalevels turns one image into a sequence of progressively richer color quantizations.
//!
//! For a requested number of steps, the image is clustered into a logarithmically increasing
//! number of colors (2 up to 64) with k-means, every level is rendered back to pixels, and the
//! frames are assembled into a short video. The public API is session-oriented:
//!
//! - Decode a [`RasterImage`] (see [`raster::decode`])
//! - Create a [`RunSession`] with a step count and [`RunOpts`]
//! - Run it against a [`VideoEncoder`], optionally through a [`Workbench`]
//!
//! All long-running stages poll a [`Cooperative`] scheduler, so hosts can stay responsive and
//! cancel runs.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Cluster-level schedule and k-means engine.
pub mod cluster;
/// Video assembly and encoders.
pub mod encode;
/// Raster images, decoding and sample conversion.
pub mod raster;
/// Frame reconstruction.
pub mod render;
/// Run sessions, cooperative scheduling and options.
pub mod session;

pub use crate::foundation::core::{Fps, FrameIndex};
pub use crate::foundation::error::{ChromaError, ChromaResult};

pub use crate::cluster::kmeans::{KMeans, KMeansOpts, KMeansState};
pub use crate::cluster::levels::{cluster_levels, level_at};
pub use crate::encode::assemble::{AssembleOpts, VideoArtifact, assemble};
pub use crate::encode::ffmpeg::FfmpegEncoder;
pub use crate::encode::profile::{Codec, Container, EncodingProfile};
pub use crate::encode::sink::{EncodeConfig, InMemoryEncoder, VideoEncoder};
pub use crate::raster::RasterImage;
pub use crate::raster::samples::{SampleMatrix, from_assignment};
pub use crate::render::frame::{Frame, FrameRenderer};
pub use crate::session::cooperative::{CancellationToken, Cooperative, HostYield, ThreadYield};
pub use crate::session::opts::RunOpts;
pub use crate::session::run_session::{Progress, RunFailure, RunOutput, RunSession};
pub use crate::session::workbench::Workbench;
