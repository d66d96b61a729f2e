//! Checkpoint artifact loading.
//!
//! A checkpoint is a directory holding three files produced at training time:
//!
//! - `config.json`: the hyperparameter record
//! - `vocab.json`: the exact vocabulary used for training
//! - `model.safetensors`: the weight state, PyTorch-compatible tensor names
//!
//! Loading is a startup precondition: any missing, unreadable, or
//! structurally incompatible component is fatal, never a per-request error.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use serde::{Deserialize, Serialize};
use tracing::info;

use encoder::Vocabulary;

use crate::cnn::CnnScorer;
use crate::error::{ModelError, Result};
use crate::lstm::LstmScorer;
use crate::scorer::SentimentScorer;

pub const CONFIG_FILE: &str = "config.json";
pub const VOCAB_FILE: &str = "vocab.json";
pub const WEIGHTS_FILE: &str = "model.safetensors";

fn default_max_length() -> usize {
    encoder::DEFAULT_MAX_LENGTH
}

fn default_filter_sizes() -> Vec<usize> {
    vec![3, 4, 5]
}

fn default_n_filters() -> usize {
    100
}

/// Which concrete scorer the weights belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Lstm,
    Cnn,
}

/// Hyperparameter record persisted in `config.json`.
///
/// `dropout` is recorded for provenance but inert at serving time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub architecture: Architecture,
    pub embedding_dim: usize,
    pub hidden_dim: usize,
    pub n_layers: usize,
    pub dropout: f64,
    pub bidirectional: bool,
    /// Sequence length the encoder must use to match training
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Convolution filters per kernel size (CNN only)
    #[serde(default = "default_n_filters")]
    pub n_filters: usize,
    /// Convolution kernel sizes (CNN only)
    #[serde(default = "default_filter_sizes")]
    pub filter_sizes: Vec<usize>,
}

/// A fully loaded, ready-to-serve model artifact.
pub struct Checkpoint {
    pub vocab: Arc<Vocabulary>,
    pub hyperparameters: Hyperparameters,
    pub scorer: Arc<dyn SentimentScorer>,
}

impl std::fmt::Debug for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkpoint")
            .field("hyperparameters", &self.hyperparameters)
            .finish_non_exhaustive()
    }
}

impl Checkpoint {
    /// Load and validate a checkpoint directory on the given device.
    pub fn load(dir: &Path, device: &Device) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ModelError::ArtifactMissing {
                path: dir.display().to_string(),
            });
        }

        let hyperparameters = read_config(&dir.join(CONFIG_FILE))?;
        validate_hyperparameters(&hyperparameters)?;

        let vocab = Arc::new(Vocabulary::load(&dir.join(VOCAB_FILE))?);

        let weights_path = dir.join(WEIGHTS_FILE);
        if !weights_path.is_file() {
            return Err(ModelError::ArtifactMissing {
                path: weights_path.display().to_string(),
            });
        }
        // Safety: the weights file is mapped read-only and must not be
        // modified while the service runs.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, device)
                .map_err(|e| ModelError::Incompatible {
                    reason: e.to_string(),
                })?
        };

        let scorer: Arc<dyn SentimentScorer> = match hyperparameters.architecture {
            Architecture::Lstm => Arc::new(
                LstmScorer::load(vb, &hyperparameters, vocab.len(), device.clone())
                    .map_err(incompatible)?,
            ),
            Architecture::Cnn => Arc::new(
                CnnScorer::load(vb, &hyperparameters, vocab.len(), device.clone())
                    .map_err(incompatible)?,
            ),
        };

        info!(
            architecture = ?hyperparameters.architecture,
            vocab_size = vocab.len(),
            embedding_dim = hyperparameters.embedding_dim,
            hidden_dim = hyperparameters.hidden_dim,
            n_layers = hyperparameters.n_layers,
            bidirectional = hyperparameters.bidirectional,
            "Loaded model checkpoint from {}",
            dir.display()
        );

        Ok(Self {
            vocab,
            hyperparameters,
            scorer,
        })
    }
}

fn read_config(path: &Path) -> Result<Hyperparameters> {
    let file = File::open(path).map_err(|_| ModelError::ArtifactMissing {
        path: path.display().to_string(),
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn validate_hyperparameters(hp: &Hyperparameters) -> Result<()> {
    if hp.embedding_dim == 0 || hp.hidden_dim == 0 || hp.n_layers == 0 || hp.max_length == 0 {
        return Err(ModelError::Incompatible {
            reason: "embedding_dim, hidden_dim, n_layers and max_length must be non-zero".into(),
        });
    }
    if hp.architecture == Architecture::Cnn {
        if hp.filter_sizes.is_empty() || hp.n_filters == 0 {
            return Err(ModelError::Incompatible {
                reason: "CNN checkpoints require filter_sizes and n_filters".into(),
            });
        }
        if let Some(&widest) = hp.filter_sizes.iter().max() {
            if widest > hp.max_length {
                return Err(ModelError::Incompatible {
                    reason: format!(
                        "filter size {widest} exceeds max_length {}",
                        hp.max_length
                    ),
                });
            }
        }
    }
    Ok(())
}

// Shape mismatches surface as candle errors while wiring up layers; at load
// time they all mean the same thing: the artifact does not match its config.
fn incompatible(e: candle_core::Error) -> ModelError {
    ModelError::Incompatible {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lstm_config_json() -> &'static str {
        r#"{
            "architecture": "lstm",
            "embedding_dim": 100,
            "hidden_dim": 256,
            "n_layers": 2,
            "dropout": 0.5,
            "bidirectional": true
        }"#
    }

    #[test]
    fn test_config_parses_with_defaults() {
        let hp: Hyperparameters = serde_json::from_str(lstm_config_json()).unwrap();
        assert_eq!(hp.architecture, Architecture::Lstm);
        assert_eq!(hp.max_length, encoder::DEFAULT_MAX_LENGTH);
        assert_eq!(hp.filter_sizes, vec![3, 4, 5]);
        assert!(hp.bidirectional);
    }

    #[test]
    fn test_validate_rejects_zero_dims() {
        let mut hp: Hyperparameters = serde_json::from_str(lstm_config_json()).unwrap();
        hp.hidden_dim = 0;
        assert!(matches!(
            validate_hyperparameters(&hp),
            Err(ModelError::Incompatible { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_filter_wider_than_sequence() {
        let mut hp: Hyperparameters = serde_json::from_str(lstm_config_json()).unwrap();
        hp.architecture = Architecture::Cnn;
        hp.max_length = 4;
        hp.filter_sizes = vec![3, 5];
        assert!(matches!(
            validate_hyperparameters(&hp),
            Err(ModelError::Incompatible { .. })
        ));
    }

    #[test]
    fn test_load_missing_directory_is_fatal() {
        let err = Checkpoint::load(Path::new("/nonexistent/model-dir"), &Device::Cpu).unwrap_err();
        assert!(matches!(err, ModelError::ArtifactMissing { .. }));
    }
}
