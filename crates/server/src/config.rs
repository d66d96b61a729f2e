//! Server configuration from the environment.
//!
//! Supported variables (a `.env` file is honored when present):
//!
//! - `MODEL_DIR`: checkpoint directory (default `models/sentiment`)
//! - `BIND_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `MAX_REVIEW_CHARS`: request text cap in characters (default 5000)

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default cap on prediction/review text, in characters.
pub const DEFAULT_MAX_REVIEW_CHARS: usize = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub model_dir: PathBuf,
    pub bind_addr: String,
    pub max_review_chars: usize,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine; explicit environment always wins
        let _ = dotenvy::dotenv();

        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models/sentiment"));
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let max_review_chars = match env::var("MAX_REVIEW_CHARS") {
            Ok(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("Invalid MAX_REVIEW_CHARS value: {raw}"))?,
            Err(_) => DEFAULT_MAX_REVIEW_CHARS,
        };

        Ok(Self {
            model_dir,
            bind_addr,
            max_review_chars,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models/sentiment"),
            bind_addr: "0.0.0.0:8080".to_string(),
            max_review_chars: DEFAULT_MAX_REVIEW_CHARS,
        }
    }
}
