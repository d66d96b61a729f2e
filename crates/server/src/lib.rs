//! HTTP serving layer for the sentiment classification service.
//!
//! Wires the loaded model, the prediction service, the review store and the
//! telemetry registry into an axum router.

pub mod config;
pub mod predict;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use predict::{PredictError, PredictionService};
pub use routes::router;
pub use state::AppState;
pub use telemetry::Telemetry;

use std::sync::Arc;

use anyhow::{Context, Result};
use candle_core::Device;
use tracing::info;

use encoder::Encoder;
use model::Checkpoint;

/// Load the checkpoint and assemble ready-to-serve application state.
pub fn bootstrap(config: &ServerConfig) -> Result<AppState> {
    let device = Device::cuda_if_available(0).context("Failed to select compute device")?;
    info!(device = ?device, model_dir = %config.model_dir.display(), "Loading checkpoint");

    let checkpoint = Checkpoint::load(&config.model_dir, &device)
        .with_context(|| format!("Failed to load checkpoint from {}", config.model_dir.display()))?;
    info!(
        architecture = ?checkpoint.hyperparameters.architecture,
        vocab_size = checkpoint.vocab.len(),
        "Model ready"
    );

    let encoder = Encoder::with_max_length(
        Arc::clone(&checkpoint.vocab),
        checkpoint.hyperparameters.max_length,
    );
    let predictor = PredictionService::new(
        encoder,
        Arc::clone(&checkpoint.scorer),
        config.max_review_chars,
    );
    let telemetry = Telemetry::new().context("Failed to build metrics registry")?;

    Ok(AppState::new(predictor, telemetry))
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = bootstrap(&config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, app).await.context("Server error")
}
