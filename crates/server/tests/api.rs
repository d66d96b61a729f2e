//! End-to-end tests over the router with a deterministic keyword scorer.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use encoder::{Encoder, Vocabulary};
use model::SentimentScorer;
use server::{AppState, PredictionService, Telemetry, router};

/// Scores by keyword instead of learned weights. The test vocabulary assigns
/// "brilliant" id 2 and "terrible" id 3.
struct KeywordScorer;

impl SentimentScorer for KeywordScorer {
    fn score(&self, ids: &[u32], true_length: usize) -> model::Result<f32> {
        let ids = &ids[..true_length];
        if ids.contains(&2) {
            Ok(3.0)
        } else if ids.contains(&3) {
            Ok(-3.0)
        } else {
            Ok(-0.1)
        }
    }
}

fn app() -> Router {
    app_with_cap(5000)
}

fn app_with_cap(max_chars: usize) -> Router {
    let vocab = Arc::new(Vocabulary::from_tokens(["brilliant", "terrible"]));
    let predictor = PredictionService::new(
        Encoder::with_max_length(vocab, 32),
        Arc::new(KeywordScorer),
        max_chars,
    );
    router(AppState::new(predictor, Telemetry::new().unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_reports_model_and_store() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["movies_tracked"], 0);
}

#[tokio::test]
async fn test_predict_classifies_both_ways() {
    let app = app();

    let (status, body) =
        send(&app, post_json("/predict", json!({"text": "a brilliant film"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "positive");
    assert!(body["probability"].as_f64().unwrap() > 0.5);
    assert_eq!(body["confidence"], body["probability"]);

    let (status, body) =
        send(&app, post_json("/predict", json!({"text": "truly terrible"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "negative");
    assert!(body["probability"].as_f64().unwrap() < 0.5);
    assert!(body["confidence"].as_f64().unwrap() >= 0.5);
}

#[tokio::test]
async fn test_predict_rejects_missing_and_empty_text() {
    let app = app();

    for body in [json!({}), json!({"text": ""}), json!({"text": "   "})] {
        let (status, response) = send(&app, post_json("/predict", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "No text provided");
    }
}

#[tokio::test]
async fn test_predict_enforces_character_cap() {
    let app = app_with_cap(20);
    let long = "a".repeat(21);

    let (status, body) = send(&app, post_json("/predict", json!({"text": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Text too long (max 20 characters)");
}

#[tokio::test]
async fn test_add_review_then_movie_summary() {
    let app = app();

    for text in ["brilliant pacing", "a brilliant score", "just terrible"] {
        let (status, body) = send(
            &app,
            post_json("/add_review", json!({"movie": "Inception", "review": text})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movie"], "inception");
        assert_eq!(body["review_added"], true);
    }

    let (status, body) = send(&app, get("/movie/Inception")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["movie"], "inception");
    assert_eq!(body["total_reviews"], 3);
    assert_eq!(body["positive_reviews"], 2);
    assert_eq!(body["negative_reviews"], 1);
    assert_eq!(body["positive_percentage"], 66.7);
    assert_eq!(body["score"], 6.7);
    assert_eq!(body["recommendation"], "Worth watching. Generally positive reviews.");

    let recent = body["recent_reviews"].as_array().unwrap();
    assert_eq!(recent.len(), 3);
    assert_eq!(recent[0]["text"], "brilliant pacing");
    assert_eq!(recent[2]["sentiment"], "negative");
}

#[tokio::test]
async fn test_add_review_requires_movie_and_review() {
    let app = app();

    for body in [
        json!({}),
        json!({"movie": "Dune"}),
        json!({"review": "brilliant"}),
        json!({"movie": "  ", "review": "brilliant"}),
        json!({"movie": "Dune", "review": ""}),
    ] {
        let (status, response) = send(&app, post_json("/add_review", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Movie name and review required");
    }

    // Nothing half-recorded
    let (_, health) = send(&app, get("/health")).await;
    assert_eq!(health["movies_tracked"], 0);
}

#[tokio::test]
async fn test_movie_names_are_case_folded() {
    let app = app();

    send(
        &app,
        post_json("/add_review", json!({"movie": "DUNE", "review": "brilliant"})),
    )
    .await;
    send(
        &app,
        post_json("/add_review", json!({"movie": " dune ", "review": "terrible"})),
    )
    .await;

    let (status, body) = send(&app, get("/movie/Dune")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_reviews"], 2);
}

#[tokio::test]
async fn test_unknown_movie_is_404() {
    let app = app();
    let (status, body) = send(&app, get("/movie/neverreviewed")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("neverreviewed"));
}

#[tokio::test]
async fn test_movies_listing_sorted_by_volume() {
    let app = app();

    for _ in 0..2 {
        send(
            &app,
            post_json("/add_review", json!({"movie": "Heat", "review": "brilliant"})),
        )
        .await;
    }
    send(
        &app,
        post_json("/add_review", json!({"movie": "Alien", "review": "terrible"})),
    )
    .await;

    let (status, body) = send(&app, get("/movies")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let movies = body["movies"].as_array().unwrap();
    assert_eq!(movies[0]["movie"], "heat");
    assert_eq!(movies[0]["total_reviews"], 2);
    assert_eq!(movies[0]["positive_percentage"], 100.0);
    assert_eq!(movies[1]["movie"], "alien");
}

#[tokio::test]
async fn test_metrics_counts_predictions() {
    let app = app();

    send(&app, post_json("/predict", json!({"text": "brilliant"}))).await;
    send(&app, post_json("/predict", json!({"text": "terrible"}))).await;
    send(
        &app,
        post_json("/add_review", json!({"movie": "Dune", "review": "brilliant"})),
    )
    .await;

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(body.contains("predictions_total 3"));
    assert!(body.contains("positive_predictions_total 2"));
    assert!(body.contains("negative_predictions_total 1"));
    assert!(body.contains("prediction_duration_seconds"));
}
