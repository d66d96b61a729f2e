//! Error types for model loading and scoring.

use thiserror::Error;

/// Errors that can occur while loading a checkpoint or scoring a sequence.
///
/// Loading errors are startup preconditions: the service must refuse to start
/// rather than serve without a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Checkpoint directory or one of its component files is missing
    #[error("Checkpoint artifact not found: {path}")]
    ArtifactMissing { path: String },

    /// I/O error while reading a checkpoint component
    #[error("I/O error reading checkpoint: {0}")]
    IoError(#[from] std::io::Error),

    /// config.json could not be parsed
    #[error("Failed to parse checkpoint config: {0}")]
    ConfigError(#[from] serde_json::Error),

    /// vocab.json was missing, malformed, or lacked reserved tokens
    #[error("Invalid checkpoint vocabulary: {0}")]
    VocabError(#[from] encoder::VocabError),

    /// Weights are structurally incompatible with the declared hyperparameters
    #[error("Checkpoint incompatible with declared hyperparameters: {reason}")]
    Incompatible { reason: String },

    /// A zero-length sequence was handed to the scorer
    ///
    /// The prediction service validates input first, so this surfacing at
    /// runtime indicates a caller bypassed validation.
    #[error("Cannot score an empty sequence")]
    EmptySequence,

    /// Tensor operation failed during the forward pass
    #[error("Inference error: {0}")]
    Inference(#[from] candle_core::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ModelError>;
