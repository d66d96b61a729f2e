//! # Encoder Crate
//!
//! Vocabulary handling and text-to-sequence encoding for the sentiment
//! service.
//!
//! ## Main Components
//!
//! - **vocab**: the immutable token -> id mapping with `<unk>`/`<pad>`
//!   reserved entries, loaded from the JSON persisted at training time
//! - **encoder**: the deterministic tokenize/truncate/pad pipeline that turns
//!   raw text into a fixed-length id sequence plus its true length
//! - **error**: error types for vocabulary loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use encoder::{Encoder, Vocabulary};
//!
//! let vocab = Arc::new(Vocabulary::load(Path::new("model/vocab.json"))?);
//! let encoder = Encoder::new(vocab);
//!
//! let encoded = encoder.encode("Absolutely brilliant film");
//! assert_eq!(encoded.ids.len(), encoder.max_length());
//! ```

pub mod encoder;
pub mod error;
pub mod vocab;

// Re-export commonly used types for convenience
pub use encoder::{DEFAULT_MAX_LENGTH, EncodedText, Encoder, tokenize};
pub use error::{Result, VocabError};
pub use vocab::{PAD_TOKEN, UNKNOWN_TOKEN, Vocabulary};
