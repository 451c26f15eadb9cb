//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring models
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Saved state version is not supported by this version
    #[error("Unsupported saved state version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// A required entry is absent from the saved state
    #[error("Saved state has no entry for key '{key}'")]
    MissingEntry { key: String },
}
