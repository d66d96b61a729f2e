//! Shared application state handed to every request handler.

use std::sync::Arc;

use store::ReviewStore;

use crate::predict::PredictionService;
use crate::telemetry::Telemetry;

/// Everything a handler needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub predictor: PredictionService,
    pub store: Arc<ReviewStore>,
    pub telemetry: Arc<Telemetry>,
}

impl AppState {
    pub fn new(predictor: PredictionService, telemetry: Telemetry) -> Self {
        Self {
            predictor,
            store: Arc::new(ReviewStore::new()),
            telemetry: Arc::new(telemetry),
        }
    }
}
