//! Recurrent sentiment scorer: embedding + stacked (bi)LSTM + linear head.
//!
//! Weight names follow the PyTorch convention the training pipeline exports
//! (`embedding.weight`, `lstm.weight_ih_l{n}` with a `_reverse` suffix for the
//! backward direction, `fc.weight`/`fc.bias`), so a converted training
//! checkpoint loads without renaming.

use candle_core::{D, Device, Tensor};
use candle_nn::rnn::{Direction, LSTM, LSTMConfig, RNN, lstm};
use candle_nn::{Embedding, Linear, Module, VarBuilder, embedding, linear};

use crate::checkpoint::Hyperparameters;
use crate::error::{ModelError, Result};
use crate::scorer::SentimentScorer;

struct LstmLayer {
    fwd: LSTM,
    bwd: Option<LSTM>,
}

/// Bidirectional LSTM classifier over encoded sequences.
///
/// Padding positions are ignored by construction: the forward pass only ever
/// sees the first `true_length` tokens of the sequence.
pub struct LstmScorer {
    embedding: Embedding,
    layers: Vec<LstmLayer>,
    fc: Linear,
    device: Device,
}

impl LstmScorer {
    /// Wire up the layers against loaded weights.
    ///
    /// Any shape mismatch between the declared hyperparameters and the stored
    /// tensors surfaces here as an error.
    pub fn load(
        vb: VarBuilder,
        hp: &Hyperparameters,
        vocab_size: usize,
        device: Device,
    ) -> candle_core::Result<Self> {
        let embedding = embedding(vocab_size, hp.embedding_dim, vb.pp("embedding"))?;
        let directions = if hp.bidirectional { 2 } else { 1 };

        let lstm_vb = vb.pp("lstm");
        let mut layers = Vec::with_capacity(hp.n_layers);
        for layer_idx in 0..hp.n_layers {
            let in_dim = if layer_idx == 0 {
                hp.embedding_dim
            } else {
                hp.hidden_dim * directions
            };
            let fwd = lstm(
                in_dim,
                hp.hidden_dim,
                LSTMConfig {
                    layer_idx,
                    direction: Direction::Forward,
                    ..Default::default()
                },
                lstm_vb.clone(),
            )?;
            let bwd = if hp.bidirectional {
                Some(lstm(
                    in_dim,
                    hp.hidden_dim,
                    LSTMConfig {
                        layer_idx,
                        direction: Direction::Backward,
                        ..Default::default()
                    },
                    lstm_vb.clone(),
                )?)
            } else {
                None
            };
            layers.push(LstmLayer { fwd, bwd });
        }

        let fc = linear(hp.hidden_dim * directions, 1, vb.pp("fc"))?;
        Ok(Self {
            embedding,
            layers,
            fc,
            device,
        })
    }
}

impl SentimentScorer for LstmScorer {
    fn score(&self, ids: &[u32], true_length: usize) -> Result<f32> {
        if true_length == 0 {
            return Err(ModelError::EmptySequence);
        }
        let len = true_length.min(ids.len());

        let input = Tensor::new(&ids[..len], &self.device)?.unsqueeze(0)?;
        // [1, len, embedding_dim]
        let mut xs = self.embedding.forward(&input)?;

        // Index order used to feed the backward direction and to realign its
        // outputs with forward time.
        let reverse_idx: Vec<u32> = (0..len as u32).rev().collect();
        let reverse_idx = Tensor::new(reverse_idx.as_slice(), &self.device)?;

        let mut final_hidden: Option<Tensor> = None;
        for layer in &self.layers {
            let fwd_states = layer.fwd.seq(&xs)?;
            let fwd_out = layer.fwd.states_to_tensor(&fwd_states)?;

            let (out, hidden) = match &layer.bwd {
                Some(bwd) => {
                    let reversed = xs.index_select(&reverse_idx, 1)?;
                    let bwd_states = bwd.seq(&reversed)?;
                    let bwd_out = bwd
                        .states_to_tensor(&bwd_states)?
                        .index_select(&reverse_idx, 1)?;
                    let out = Tensor::cat(&[&fwd_out, &bwd_out], D::Minus1)?;
                    // Forward final state is at the last step; the backward
                    // direction's final state corresponds to t = 0.
                    let hidden = Tensor::cat(
                        &[fwd_states[len - 1].h(), bwd_states[len - 1].h()],
                        D::Minus1,
                    )?;
                    (out, hidden)
                }
                None => (fwd_out, fwd_states[len - 1].h().clone()),
            };

            final_hidden = Some(hidden);
            xs = out;
        }

        let final_hidden = final_hidden.ok_or_else(|| ModelError::Incompatible {
            reason: "model has no LSTM layers".into(),
        })?;

        // [1, 1] -> scalar
        let logit = self.fc.forward(&final_hidden)?;
        Ok(logit.squeeze(1)?.squeeze(0)?.to_scalar::<f32>()?)
    }
}
