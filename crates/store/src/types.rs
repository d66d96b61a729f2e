//! Core domain types shared across the sentiment service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Binary sentiment class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Decision rule over a probability: positive iff strictly above 0.5.
    pub fn from_probability(probability: f32) -> Self {
        if probability > 0.5 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one piece of text.
///
/// Invariants: `sentiment == Positive` iff `probability > 0.5`, and
/// `confidence = probability` when positive, `1 - probability` otherwise, so
/// `confidence` always lies in `[0.5, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub sentiment: Sentiment,
    pub probability: f32,
    pub confidence: f32,
}

impl Prediction {
    /// Derive a prediction from a raw probability per the decision rule.
    pub fn from_probability(probability: f32) -> Self {
        let sentiment = Sentiment::from_probability(probability);
        let confidence = match sentiment {
            Sentiment::Positive => probability,
            Sentiment::Negative => 1.0 - probability,
        };
        Self {
            sentiment,
            probability,
            confidence,
        }
    }
}

/// One classified review, immutable once created.
///
/// Owned exclusively by the aggregate that stores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub text: String,
    pub sentiment: Sentiment,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}
