//! Error types for the encoder crate.

use thiserror::Error;

/// Errors that can occur while loading or validating a vocabulary.
///
/// Encoding itself is infallible for well-formed string input; only the
/// load/construction path can fail.
#[derive(Error, Debug)]
pub enum VocabError {
    /// Vocabulary file could not be found or opened
    #[error("Failed to open vocabulary file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading the file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Vocabulary file was not valid JSON
    #[error("Failed to parse vocabulary JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A reserved token (`<unk>` or `<pad>`) is missing from the mapping
    #[error("Vocabulary is missing reserved token {token}")]
    MissingReservedToken { token: &'static str },

    /// Two tokens map to the same id
    #[error("Duplicate id {id} for tokens {first} and {second}")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, VocabError>;
