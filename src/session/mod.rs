//! Session-oriented run API.

/// Host yielding and cancellation.
pub mod cooperative;
/// Run options and their JSON loader.
pub mod opts;
/// One image, one step count, one frame sequence.
pub mod run_session;
/// Serialized single-slot run owner.
pub mod workbench;
