//! The narrow scoring interface the serving path depends on.

use crate::error::Result;

/// Opaque scoring function: encoded sequence in, raw logit out.
///
/// The serving path depends only on this trait, so the numeric backend can be
/// swapped for a stub in tests without touching the HTTP layer. Implementors
/// must be safe to call concurrently: inference is read-only over loaded
/// weights, so `Send + Sync` carries no extra locking.
///
/// Contract:
/// - `ids` is a fixed-length, right-padded sequence; only the first
///   `true_length` positions are real tokens
/// - `true_length == 0` is an error ([`crate::ModelError::EmptySequence`])
/// - the returned value is the pre-sigmoid logit
pub trait SentimentScorer: Send + Sync {
    fn score(&self, ids: &[u32], true_length: usize) -> Result<f32>;
}

/// Logistic squashing applied to a scorer's logit to obtain a probability.
///
/// Output is in the open interval (0, 1) for finite input.
pub fn sigmoid(logit: f32) -> f32 {
    1.0 / (1.0 + (-logit).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        assert_eq!(sigmoid(0.0), 0.5);
        let p = sigmoid(2.0);
        let q = sigmoid(-2.0);
        assert!((p + q - 1.0).abs() < 1e-6);
        assert!(p > 0.5 && q < 0.5);
    }

    #[test]
    fn test_sigmoid_saturates_inside_unit_interval() {
        assert!(sigmoid(40.0) <= 1.0);
        assert!(sigmoid(40.0) > 0.999);
        assert!(sigmoid(-40.0) >= 0.0);
        assert!(sigmoid(-40.0) < 0.001);
    }
}
