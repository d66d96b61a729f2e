//! Text-to-sequence encoding.
//!
//! The encoder must reproduce the exact tokenization used when the vocabulary
//! was built: lowercase, then split on whitespace. Any divergence between
//! training-time and serving-time tokenization silently degrades the model,
//! so the rule lives in one place ([`tokenize`]) and stays deliberately dumb.

use std::sync::Arc;

use crate::vocab::Vocabulary;

/// Default maximum sequence length, matching the training configuration.
pub const DEFAULT_MAX_LENGTH: usize = 256;

/// A fixed-length encoded sequence plus the number of real tokens.
///
/// Invariants: `ids.len()` equals the encoder's configured maximum length and
/// `true_length <= ids.len()`; positions at and beyond `true_length` hold the
/// `<pad>` id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    pub ids: Vec<u32>,
    pub true_length: usize,
}

/// Tokenize text the way the training pipeline does: lowercase + whitespace.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace().map(|t| t.to_lowercase())
}

/// Maps raw text to fixed-length integer sequences through a vocabulary.
///
/// Pure and deterministic; encoding cannot fail. The empty string encodes to
/// an all-`<pad>` sequence with `true_length == 0` (callers that cannot
/// tolerate a zero-length input must reject it before encoding).
#[derive(Debug, Clone)]
pub struct Encoder {
    vocab: Arc<Vocabulary>,
    max_length: usize,
}

impl Encoder {
    /// Create an encoder with the default maximum length.
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self::with_max_length(vocab, DEFAULT_MAX_LENGTH)
    }

    /// Create an encoder with an explicit maximum length.
    pub fn with_max_length(vocab: Arc<Vocabulary>, max_length: usize) -> Self {
        Self { vocab, max_length }
    }

    /// Encode text: tokenize, truncate, numericalize, right-pad.
    pub fn encode(&self, text: &str) -> EncodedText {
        let mut ids: Vec<u32> = tokenize(text)
            .take(self.max_length)
            .map(|token| self.vocab.id_of(&token))
            .collect();
        let true_length = ids.len();
        ids.resize(self.max_length, self.vocab.pad_id());
        EncodedText { ids, true_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn vocab(&self) -> &Arc<Vocabulary> {
        &self.vocab
    }
}
