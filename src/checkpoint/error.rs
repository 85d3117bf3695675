//! Checkpoint errors.

use thiserror::Error;

/// Why a controller checkpoint could not be written or restored.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to encode crossing checkpoint: {0}")]
    Encode(String),

    #[error("failed to decode crossing checkpoint: {0}")]
    Decode(String),

    #[error("checkpoint format v{found} is not supported (expected v{supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The decoded fields describe a controller that could never exist.
    #[error("inconsistent crossing checkpoint: {0}")]
    Inconsistent(String),
}
