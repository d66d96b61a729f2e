//! Synthetic checkpoint builders.
//!
//! Produces small, deterministically-weighted artifacts for tests and local
//! tooling: recurrent and convolutional weight maps shaped to match a given
//! hyperparameter record, and a writer that lays a complete checkpoint
//! directory on disk. All weights are zero except the head bias, so the logit
//! of every input collapses to a known constant.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use candle_core::{DType, Device, Tensor};

use crate::checkpoint::{Architecture, CONFIG_FILE, Hyperparameters, VOCAB_FILE, WEIGHTS_FILE};
use crate::error::Result;

/// A small recurrent configuration suitable for fast tests.
pub fn lstm_hyperparameters(bidirectional: bool) -> Hyperparameters {
    Hyperparameters {
        architecture: Architecture::Lstm,
        embedding_dim: 6,
        hidden_dim: 4,
        n_layers: 2,
        dropout: 0.5,
        bidirectional,
        max_length: 16,
        n_filters: 100,
        filter_sizes: vec![3, 4, 5],
    }
}

/// A small convolutional configuration suitable for fast tests.
pub fn cnn_hyperparameters() -> Hyperparameters {
    Hyperparameters {
        architecture: Architecture::Cnn,
        embedding_dim: 6,
        hidden_dim: 4,
        n_layers: 1,
        dropout: 0.5,
        bidirectional: false,
        max_length: 16,
        n_filters: 3,
        filter_sizes: vec![2, 3],
    }
}

fn zeros(shape: &[usize]) -> Tensor {
    Tensor::zeros(shape, DType::F32, &Device::Cpu).expect("allocate zero tensor")
}

/// Zero-weight LSTM tensors matching `hp`, with `fc.bias` set to `fc_bias`.
pub fn lstm_weights(hp: &Hyperparameters, vocab_size: usize, fc_bias: f32) -> HashMap<String, Tensor> {
    let directions = if hp.bidirectional { 2 } else { 1 };
    let mut tensors = HashMap::new();
    tensors.insert(
        "embedding.weight".to_string(),
        zeros(&[vocab_size, hp.embedding_dim]),
    );

    let suffixes: &[&str] = if hp.bidirectional {
        &["", "_reverse"]
    } else {
        &[""]
    };
    for layer in 0..hp.n_layers {
        let in_dim = if layer == 0 {
            hp.embedding_dim
        } else {
            hp.hidden_dim * directions
        };
        for suffix in suffixes {
            tensors.insert(
                format!("lstm.weight_ih_l{layer}{suffix}"),
                zeros(&[4 * hp.hidden_dim, in_dim]),
            );
            tensors.insert(
                format!("lstm.weight_hh_l{layer}{suffix}"),
                zeros(&[4 * hp.hidden_dim, hp.hidden_dim]),
            );
            tensors.insert(
                format!("lstm.bias_ih_l{layer}{suffix}"),
                zeros(&[4 * hp.hidden_dim]),
            );
            tensors.insert(
                format!("lstm.bias_hh_l{layer}{suffix}"),
                zeros(&[4 * hp.hidden_dim]),
            );
        }
    }

    tensors.insert(
        "fc.weight".to_string(),
        zeros(&[1, hp.hidden_dim * directions]),
    );
    tensors.insert(
        "fc.bias".to_string(),
        Tensor::new(&[fc_bias], &Device::Cpu).expect("allocate bias tensor"),
    );
    tensors
}

/// Zero-weight CNN tensors matching `hp`, with `fc.bias` set to `fc_bias`.
pub fn cnn_weights(hp: &Hyperparameters, vocab_size: usize, fc_bias: f32) -> HashMap<String, Tensor> {
    let mut tensors = HashMap::new();
    tensors.insert(
        "embedding.weight".to_string(),
        zeros(&[vocab_size, hp.embedding_dim]),
    );
    for (i, &filter_size) in hp.filter_sizes.iter().enumerate() {
        tensors.insert(
            format!("convs.{i}.weight"),
            zeros(&[hp.n_filters, hp.embedding_dim, filter_size]),
        );
        tensors.insert(format!("convs.{i}.bias"), zeros(&[hp.n_filters]));
    }
    tensors.insert(
        "fc.weight".to_string(),
        zeros(&[1, hp.filter_sizes.len() * hp.n_filters]),
    );
    tensors.insert(
        "fc.bias".to_string(),
        Tensor::new(&[fc_bias], &Device::Cpu).expect("allocate bias tensor"),
    );
    tensors
}

/// Write a complete checkpoint directory: config, vocabulary and weights.
///
/// The vocabulary gets `<unk>` = 0, `<pad>` = 1 and the given words from 2
/// upward, matching the training pipeline's layout.
pub fn write_checkpoint(dir: &Path, hp: &Hyperparameters, words: &[&str], fc_bias: f32) -> Result<()> {
    fs::create_dir_all(dir)?;

    let config = serde_json::to_string_pretty(hp)?;
    fs::write(dir.join(CONFIG_FILE), config)?;

    let mut vocab: HashMap<String, u32> = HashMap::new();
    vocab.insert(encoder::UNKNOWN_TOKEN.to_string(), 0);
    vocab.insert(encoder::PAD_TOKEN.to_string(), 1);
    for (i, word) in words.iter().enumerate() {
        vocab.insert((*word).to_string(), 2 + i as u32);
    }
    fs::write(dir.join(VOCAB_FILE), serde_json::to_string(&vocab)?)?;

    let vocab_size = vocab.len();
    let tensors = match hp.architecture {
        Architecture::Lstm => lstm_weights(hp, vocab_size, fc_bias),
        Architecture::Cnn => cnn_weights(hp, vocab_size, fc_bias),
    };
    candle_core::safetensors::save(&tensors, dir.join(WEIGHTS_FILE))?;
    Ok(())
}
