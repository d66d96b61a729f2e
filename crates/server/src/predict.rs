//! The stateless prediction service: validate, encode, score, decide.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use encoder::Encoder;
use model::{ModelError, SentimentScorer, sigmoid};
use store::Prediction;

/// Errors from one prediction request.
///
/// `EmptyText` and `TooLong` are caller errors; `Inference` is internal.
#[derive(Error, Debug)]
pub enum PredictError {
    #[error("No text provided")]
    EmptyText,

    #[error("Text too long (max {max} characters)")]
    TooLong { max: usize },

    #[error("Inference failed: {0}")]
    Inference(#[from] ModelError),
}

/// Classifies free text through the loaded model.
///
/// Holds no mutable state: the encoder and the scorer are both read-only
/// after startup, so concurrent predictions need no synchronization. Cloning
/// is cheap (two `Arc`s and a length), which is what lets handlers move a
/// copy onto a blocking thread.
#[derive(Clone)]
pub struct PredictionService {
    encoder: Encoder,
    scorer: Arc<dyn SentimentScorer>,
    max_chars: usize,
}

impl PredictionService {
    pub fn new(encoder: Encoder, scorer: Arc<dyn SentimentScorer>, max_chars: usize) -> Self {
        Self {
            encoder,
            scorer,
            max_chars,
        }
    }

    /// Classify `text`, applying the decision rule over the model's logit.
    ///
    /// Validation runs first, so the scorer never sees an empty sequence:
    /// any text that survives the empty check tokenizes to at least one word.
    pub fn predict(&self, text: &str) -> Result<Prediction, PredictError> {
        if text.trim().is_empty() {
            return Err(PredictError::EmptyText);
        }
        let char_count = text.chars().count();
        if char_count > self.max_chars {
            return Err(PredictError::TooLong {
                max: self.max_chars,
            });
        }

        let encoded = self.encoder.encode(text);
        let logit = self.scorer.score(&encoded.ids, encoded.true_length)?;
        let prediction = Prediction::from_probability(sigmoid(logit));

        debug!(
            chars = char_count,
            tokens = encoded.true_length,
            sentiment = %prediction.sentiment,
            probability = prediction.probability,
            "Prediction complete"
        );
        Ok(prediction)
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}
