//! # Model Crate
//!
//! Loading and scoring for the sentiment classifier.
//!
//! ## Main Components
//!
//! - **scorer**: the [`SentimentScorer`] trait, the narrow
//!   `(ids, true_length) -> logit` interface the serving path depends on,
//!   plus the [`sigmoid`] squashing applied to logits
//! - **lstm** / **cnn**: the two concrete architectures, built on
//!   candle
//! - **checkpoint**: the versioned artifact loader (config + vocabulary +
//!   safetensors weights) with structural validation
//! - **fixtures**: synthetic checkpoint builders for tests and tooling
//!
//! ## Example Usage
//!
//! ```ignore
//! use candle_core::Device;
//! use model::Checkpoint;
//!
//! let device = Device::cuda_if_available(0)?;
//! let checkpoint = Checkpoint::load(Path::new("models/sentiment"), &device)?;
//! let logit = checkpoint.scorer.score(&encoded.ids, encoded.true_length)?;
//! let probability = model::sigmoid(logit);
//! ```

pub mod checkpoint;
pub mod cnn;
pub mod error;
pub mod fixtures;
pub mod lstm;
pub mod scorer;

// Re-export commonly used types for convenience
pub use checkpoint::{Architecture, Checkpoint, Hyperparameters};
pub use cnn::CnnScorer;
pub use error::{ModelError, Result};
pub use lstm::LstmScorer;
pub use scorer::{SentimentScorer, sigmoid};
