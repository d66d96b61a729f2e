//! Convolutional sentiment scorer: embedding + Conv1d banks + linear head.
//!
//! The alternative architecture to [`crate::lstm::LstmScorer`]: one Conv1d per
//! filter size, ReLU, max-over-time pooling, concatenated features into a
//! single-logit head. Unlike the recurrent variant it consumes the full
//! padded sequence; the padding embedding row is zero at training time, so
//! pooled features are unaffected by pad positions.

use candle_core::{D, Device, Tensor};
use candle_nn::{Conv1d, Conv1dConfig, Embedding, Linear, Module, VarBuilder, conv1d, embedding, linear};

use crate::checkpoint::Hyperparameters;
use crate::error::{ModelError, Result};
use crate::scorer::SentimentScorer;

pub struct CnnScorer {
    embedding: Embedding,
    convs: Vec<Conv1d>,
    fc: Linear,
    device: Device,
}

impl CnnScorer {
    pub fn load(
        vb: VarBuilder,
        hp: &Hyperparameters,
        vocab_size: usize,
        device: Device,
    ) -> candle_core::Result<Self> {
        let embedding = embedding(vocab_size, hp.embedding_dim, vb.pp("embedding"))?;

        let mut convs = Vec::with_capacity(hp.filter_sizes.len());
        for (i, &filter_size) in hp.filter_sizes.iter().enumerate() {
            convs.push(conv1d(
                hp.embedding_dim,
                hp.n_filters,
                filter_size,
                Conv1dConfig::default(),
                vb.pp(format!("convs.{i}")),
            )?);
        }

        let fc = linear(hp.filter_sizes.len() * hp.n_filters, 1, vb.pp("fc"))?;
        Ok(Self {
            embedding,
            convs,
            fc,
            device,
        })
    }
}

impl SentimentScorer for CnnScorer {
    fn score(&self, ids: &[u32], true_length: usize) -> Result<f32> {
        if true_length == 0 {
            return Err(ModelError::EmptySequence);
        }

        let input = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // [1, embedding_dim, seq_len] for the conv banks
        let xs = self.embedding.forward(&input)?.transpose(1, 2)?;

        let mut pooled = Vec::with_capacity(self.convs.len());
        for conv in &self.convs {
            // [1, n_filters, seq_len - filter_size + 1] -> [1, n_filters]
            let features = conv.forward(&xs)?.relu()?;
            pooled.push(features.max(D::Minus1)?);
        }

        let features = Tensor::cat(&pooled, D::Minus1)?;
        let logit = self.fc.forward(&features)?;
        Ok(logit.squeeze(1)?.squeeze(0)?.to_scalar::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{cnn_hyperparameters, cnn_weights};
    use candle_core::DType;

    fn build_scorer() -> CnnScorer {
        let hp = cnn_hyperparameters();
        let tensors = cnn_weights(&hp, 8, -0.75);
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &Device::Cpu);
        CnnScorer::load(vb, &hp, 8, Device::Cpu).expect("load test weights")
    }

    #[test]
    fn test_zero_weights_score_to_bias() {
        let scorer = build_scorer();
        let hp = cnn_hyperparameters();
        let ids = vec![2u32; hp.max_length];
        let logit = scorer.score(&ids, 5).unwrap();
        assert!((logit + 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let scorer = build_scorer();
        let hp = cnn_hyperparameters();
        let ids = vec![1u32; hp.max_length];
        assert!(matches!(
            scorer.score(&ids, 0).unwrap_err(),
            ModelError::EmptySequence
        ));
    }

    #[test]
    fn test_load_rejects_mismatched_filter_count() {
        let hp = cnn_hyperparameters();
        let tensors = cnn_weights(&hp, 8, 0.0);
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &Device::Cpu);

        let mut wrong = hp.clone();
        wrong.filter_sizes.push(7);
        assert!(CnnScorer::load(vb, &wrong, 8, Device::Cpu).is_err());
    }
}
