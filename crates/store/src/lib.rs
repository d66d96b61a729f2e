//! # Store Crate
//!
//! The review aggregation store and recommendation scorer, plus the domain
//! types shared across the service.
//!
//! ## Main Components
//!
//! - **types**: Sentiment, Prediction, ReviewRecord
//! - **store**: the concurrent per-movie aggregate map with its
//!   read-after-write consistency contract
//! - **recommend**: pure scoring of aggregated counts into a 0-10 score and
//!   a categorical tier
//! - **error**: caller-error types for store operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::{Prediction, ReviewStore, recommend};
//!
//! let store = ReviewStore::new();
//! let prediction = Prediction::from_probability(0.93);
//! store.record_review("Inception", "Absolutely brilliant film", &prediction)?;
//!
//! let summary = store.summarize("inception")?;
//! let rec = recommend(summary.positive_reviews, summary.negative_reviews);
//! println!("{}: {}", summary.movie, rec.tier);
//! ```

pub mod error;
pub mod recommend;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{Result, StoreError};
pub use recommend::{Recommendation, Tier, recommend};
pub use store::{
    MovieListing, MovieSummary, RECENT_REVIEWS, RecordedReview, ReviewSnippet, ReviewStore,
    SNIPPET_MAX_CHARS,
};
pub use types::{Prediction, ReviewRecord, Sentiment};
