//! HTTP surface: routing, request/response bodies, error mapping.

use std::time::Instant;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task;
use tracing::error;

use store::{
    MovieListing, Prediction, ReviewSnippet, Sentiment, StoreError, recommend,
};

use crate::predict::PredictError;
use crate::state::AppState;

/// Build the application router over shared state.
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .route("/add_review", post(add_review))
        .route("/movie/:name", get(movie_summary))
        .route("/movies", get(list_movies))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Uniform error body: `{"error": "..."}` with a matching status code.
enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Internal(m) => {
                error!("Request failed: {m}");
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<PredictError> for ApiError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::EmptyText | PredictError::TooLong { .. } => {
                ApiError::BadRequest(err.to_string())
            }
            PredictError::Inference(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmptyMovieName | StoreError::EmptyReview => {
                ApiError::BadRequest(err.to_string())
            }
            StoreError::MovieNotFound { .. } => ApiError::NotFound(err.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct PredictRequest {
    text: Option<String>,
}

#[derive(Serialize)]
struct PredictResponse {
    sentiment: Sentiment,
    confidence: f32,
    probability: f32,
}

#[derive(Deserialize)]
struct AddReviewRequest {
    movie: Option<String>,
    review: Option<String>,
}

#[derive(Serialize)]
struct AddReviewResponse {
    movie: String,
    review_added: bool,
    sentiment: Sentiment,
    total_reviews: u64,
}

#[derive(Serialize)]
struct MovieResponse {
    movie: String,
    total_reviews: u64,
    positive_reviews: u64,
    negative_reviews: u64,
    positive_percentage: f64,
    score: f64,
    recommendation: &'static str,
    recent_reviews: Vec<ReviewSnippet>,
}

#[derive(Serialize)]
struct MoviesResponse {
    movies: Vec<MovieListing>,
    count: usize,
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "model_loaded": true,
        "movies_tracked": state.store.movies_tracked(),
    }))
}

/// Run one prediction on the blocking pool and record its telemetry.
async fn classify(state: &AppState, text: String) -> Result<Prediction, ApiError> {
    let predictor = state.predictor.clone();
    let started = Instant::now();
    let prediction = task::spawn_blocking(move || predictor.predict(&text))
        .await
        .map_err(|e| ApiError::Internal(format!("Inference task failed: {e}")))??;
    state
        .telemetry
        .observe_prediction(prediction.sentiment, started.elapsed());
    Ok(prediction)
}

async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, ApiError> {
    let text = request.text.unwrap_or_default();
    let prediction = classify(&state, text).await?;
    Ok(Json(PredictResponse {
        sentiment: prediction.sentiment,
        confidence: prediction.confidence,
        probability: prediction.probability,
    }))
}

async fn add_review(
    State(state): State<AppState>,
    Json(request): Json<AddReviewRequest>,
) -> Result<Json<AddReviewResponse>, ApiError> {
    let (movie, review) = match (request.movie, request.review) {
        (Some(movie), Some(review)) if !movie.trim().is_empty() && !review.trim().is_empty() => {
            (movie, review)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Movie name and review required".to_string(),
            ));
        }
    };

    let prediction = classify(&state, review.clone()).await?;
    let ack = state.store.record_review(&movie, &review, &prediction)?;

    Ok(Json(AddReviewResponse {
        movie: ack.movie,
        review_added: true,
        sentiment: ack.sentiment,
        total_reviews: ack.total_reviews,
    }))
}

async fn movie_summary(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MovieResponse>, ApiError> {
    let summary = state.store.summarize(&name)?;
    let rec = recommend(summary.positive_reviews, summary.negative_reviews);

    Ok(Json(MovieResponse {
        movie: summary.movie,
        total_reviews: summary.total_reviews,
        positive_reviews: summary.positive_reviews,
        negative_reviews: summary.negative_reviews,
        positive_percentage: summary.positive_percentage,
        score: rec.score,
        recommendation: rec.tier.advice(),
        recent_reviews: summary.recent_reviews,
    }))
}

async fn list_movies(State(state): State<AppState>) -> Json<MoviesResponse> {
    let movies = state.store.list_movies();
    let count = movies.len();
    Json(MoviesResponse { movies, count })
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.telemetry.render(),
    )
}
