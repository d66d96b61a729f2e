//! Error types for the review aggregation store.

use thiserror::Error;

/// Errors surfaced by store operations.
///
/// All variants are caller errors; the store itself has no internal failure
/// modes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Movie name was empty after trimming
    #[error("Movie name must not be empty")]
    EmptyMovieName,

    /// Review text was empty after trimming
    #[error("Review text must not be empty")]
    EmptyReview,

    /// No reviews have been recorded for the requested movie
    #[error("No reviews found for {movie}")]
    MovieNotFound { movie: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
