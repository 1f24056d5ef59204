/// Convenience result type used across Flipbook.
pub type FlipbookResult<T> = Result<T, FlipbookError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Interactive history operations (`execute`/`undo`/`redo`) never construct
/// these: they degrade to no-ops so an editing session is never interrupted.
/// Errors are reserved for persistence, export, and invalid caller input.
#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    /// Invalid user-provided argument (e.g. a non-positive zoom factor).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Frame index outside the store's bounds.
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),

    /// The export collaborator is not available or not initialized.
    #[error("encoder unavailable: {0}")]
    EncoderUnavailable(String),

    /// The durable key-value store is inaccessible or rejected a write.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    /// Build a [`FlipbookError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`FlipbookError::IndexOutOfRange`] value.
    pub fn index_out_of_range(msg: impl Into<String>) -> Self {
        Self::IndexOutOfRange(msg.into())
    }

    /// Build a [`FlipbookError::EncoderUnavailable`] value.
    pub fn encoder_unavailable(msg: impl Into<String>) -> Self {
        Self::EncoderUnavailable(msg.into())
    }

    /// Build a [`FlipbookError::StorageUnavailable`] value.
    pub fn storage_unavailable(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    /// Build a [`FlipbookError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
