/// Result alias used across the crate.
pub type ChromaResult<T> = Result<T, ChromaError>;

/// Error kinds surfaced by the quantization pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ChromaError {
    /// Bad caller input: steps < 2, k out of range, zero dimensions, bad options.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// None of the requested container/codec profiles is available.
    #[error("encoding unsupported: {0}")]
    EncodingUnsupported(String),

    /// The encoder finished without producing any bytes.
    #[error("encoder produced no output")]
    EmptyEncodeResult,

    /// A raster could not be reconstructed (buffer/assignment size mismatch).
    #[error("render failure: {0}")]
    RenderFailure(String),

    /// The run was cancelled at a cooperative checkpoint.
    #[error("run cancelled")]
    Cancelled,

    /// Another run is already active on the same workbench.
    #[error("a run is already in progress")]
    Busy,

    /// Option file could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// I/O and process plumbing.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChromaError {
    /// Build an [`ChromaError::InvalidConfiguration`].
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Build an [`ChromaError::EncodingUnsupported`].
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::EncodingUnsupported(msg.into())
    }

    /// Build an [`ChromaError::RenderFailure`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailure(msg.into())
    }

    /// Build an [`ChromaError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors detected before any clustering work starts.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_) | Self::Serde(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
