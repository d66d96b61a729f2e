//! The concurrent per-movie review aggregation store.
//!
//! A process-wide map from case-folded movie name to a running aggregate of
//! classified reviews. Aggregates are created lazily on first review, never
//! destroyed, and live for the service's uptime; nothing persists across
//! restarts.
//!
//! ## Concurrency discipline
//!
//! The map is a sharded [`DashMap`], so inserting a new movie only locks one
//! shard. Each aggregate sits behind its own [`Mutex`]; the
//! append-review-and-increment-count pair is applied under that lock as a
//! single atomic unit, and summaries take the same lock so every reader sees
//! a consistent point-in-time state. Writers downgrade the shard guard before
//! locking the aggregate, so updates to different movies never serialize on
//! one another beyond the brief shard access.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::{Prediction, ReviewRecord, Sentiment};

/// How many of the newest reviews a summary carries.
pub const RECENT_REVIEWS: usize = 5;

/// Display truncation limit for review text in summaries.
pub const SNIPPET_MAX_CHARS: usize = 100;

/// Per-movie running statistics.
///
/// Invariant: `positive_count + negative_count == reviews.len()` whenever the
/// aggregate's lock is not held.
#[derive(Debug, Default)]
struct MovieAggregate {
    positive_count: u64,
    negative_count: u64,
    reviews: Vec<ReviewRecord>,
}

/// Acknowledgement returned after a review is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedReview {
    pub movie: String,
    pub sentiment: Sentiment,
    pub confidence: f32,
    pub total_reviews: u64,
}

/// A truncated review as shown in summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSnippet {
    pub text: String,
    pub sentiment: Sentiment,
}

/// Read-only snapshot of one movie's aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct MovieSummary {
    pub movie: String,
    pub total_reviews: u64,
    pub positive_reviews: u64,
    pub negative_reviews: u64,
    /// Percentage of positive reviews, rounded to 1 decimal
    pub positive_percentage: f64,
    /// Most recent reviews in insertion order, oldest of the window first
    pub recent_reviews: Vec<ReviewSnippet>,
}

/// One row of the movie listing.
#[derive(Debug, Clone, Serialize)]
pub struct MovieListing {
    pub movie: String,
    pub total_reviews: u64,
    pub positive_percentage: f64,
}

/// Concurrent map from movie name to aggregate.
///
/// Constructed explicitly and passed by handle into the request-handling
/// context; tests get isolation by building a fresh store.
#[derive(Debug, Default)]
pub struct ReviewStore {
    movies: DashMap<String, Mutex<MovieAggregate>>,
}

/// Round to one decimal place for display.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn snippet(record: &ReviewRecord) -> ReviewSnippet {
    let mut text: String = record.text.chars().take(SNIPPET_MAX_CHARS).collect();
    if record.text.chars().count() > SNIPPET_MAX_CHARS {
        text.push_str("...");
    }
    ReviewSnippet {
        text,
        sentiment: record.sentiment,
    }
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-fold a movie name into its aggregate key.
    pub fn normalize(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Append a classified review to a movie's aggregate.
    ///
    /// The aggregate is created lazily for a previously-unseen name. The
    /// append and the matching count increment happen under the movie's lock,
    /// so any subsequent reader observes them together or not at all.
    pub fn record_review(
        &self,
        movie: &str,
        text: &str,
        prediction: &Prediction,
    ) -> Result<RecordedReview> {
        let key = Self::normalize(movie);
        if key.is_empty() {
            return Err(StoreError::EmptyMovieName);
        }
        if text.trim().is_empty() {
            return Err(StoreError::EmptyReview);
        }

        let record = ReviewRecord {
            text: text.to_string(),
            sentiment: prediction.sentiment,
            confidence: prediction.confidence,
            timestamp: chrono::Utc::now(),
        };

        // Holding only a shard read reference while the aggregate's own lock
        // covers the mutation keeps unrelated movies from blocking each other.
        let cell = self
            .movies
            .entry(key.clone())
            .or_default()
            .downgrade();
        let total_reviews = {
            let mut aggregate = cell.lock();
            match record.sentiment {
                Sentiment::Positive => aggregate.positive_count += 1,
                Sentiment::Negative => aggregate.negative_count += 1,
            }
            aggregate.reviews.push(record);
            debug_assert_eq!(
                aggregate.positive_count + aggregate.negative_count,
                aggregate.reviews.len() as u64
            );
            aggregate.reviews.len() as u64
        };

        debug!(
            movie = %key,
            sentiment = %prediction.sentiment,
            total_reviews,
            "Recorded review"
        );

        Ok(RecordedReview {
            movie: key,
            sentiment: prediction.sentiment,
            confidence: prediction.confidence,
            total_reviews,
        })
    }

    /// Take a consistent snapshot of a movie's aggregate.
    ///
    /// Returns [`StoreError::MovieNotFound`] for names never seen.
    pub fn summarize(&self, movie: &str) -> Result<MovieSummary> {
        let key = Self::normalize(movie);
        let cell = self.movies.get(&key).ok_or_else(|| StoreError::MovieNotFound {
            movie: key.clone(),
        })?;

        let aggregate = cell.lock();
        let total = aggregate.reviews.len() as u64;
        if total == 0 {
            return Err(StoreError::MovieNotFound { movie: key });
        }

        let recent_reviews = aggregate
            .reviews
            .iter()
            .rev()
            .take(RECENT_REVIEWS)
            .rev()
            .map(snippet)
            .collect();

        Ok(MovieSummary {
            movie: key,
            total_reviews: total,
            positive_reviews: aggregate.positive_count,
            negative_reviews: aggregate.negative_count,
            positive_percentage: round1(aggregate.positive_count as f64 / total as f64 * 100.0),
            recent_reviews,
        })
    }

    /// List all movies with at least one review, most-reviewed first.
    pub fn list_movies(&self) -> Vec<MovieListing> {
        let mut listings: Vec<MovieListing> = self
            .movies
            .iter()
            .filter_map(|entry| {
                let aggregate = entry.value().lock();
                let total = aggregate.reviews.len() as u64;
                if total == 0 {
                    return None;
                }
                Some(MovieListing {
                    movie: entry.key().clone(),
                    total_reviews: total,
                    positive_percentage: round1(
                        aggregate.positive_count as f64 / total as f64 * 100.0,
                    ),
                })
            })
            .collect();

        listings.sort_by(|a, b| b.total_reviews.cmp(&a.total_reviews));
        listings
    }

    /// Number of distinct movies ever reviewed.
    pub fn movies_tracked(&self) -> usize {
        self.movies.len()
    }
}
