//! Cluster-level scheduling and the k-means engine.

/// k-means assignment/update loop.
pub mod kmeans;
/// Logarithmic cluster-count schedule.
pub mod levels;
pub(crate) mod seed;
