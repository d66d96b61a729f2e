//! Recommendation scoring over aggregated review counts.
//!
//! A pure function of the positive/negative tallies; no store access, no
//! side effects.

use serde::Serialize;

use crate::store::round1;

/// Categorical recommendation derived from the positive percentage.
///
/// Tier boundaries are inclusive on the lower bound: exactly 80.0% is still
/// `HighlyRecommended`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    HighlyRecommended,
    WorthWatching,
    MixedReviews,
    NotRecommended,
}

impl Tier {
    fn from_positive_percentage(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Tier::HighlyRecommended
        } else if percentage >= 60.0 {
            Tier::WorthWatching
        } else if percentage >= 40.0 {
            Tier::MixedReviews
        } else {
            Tier::NotRecommended
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::HighlyRecommended => "highly recommended",
            Tier::WorthWatching => "worth watching",
            Tier::MixedReviews => "mixed reviews",
            Tier::NotRecommended => "not recommended",
        }
    }

    /// Human-readable advice line shown in summaries.
    pub fn advice(&self) -> &'static str {
        match self {
            Tier::HighlyRecommended => "Highly recommended! Most viewers loved it.",
            Tier::WorthWatching => "Worth watching. Generally positive reviews.",
            Tier::MixedReviews => "Mixed reviews. Watch at your own discretion.",
            Tier::NotRecommended => "Not recommended. Most viewers disliked it.",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Score and tier for one movie's counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    /// 0.0 to 10.0, rounded to 1 decimal
    pub score: f64,
    /// 0.0 to 100.0, rounded to 1 decimal
    pub positive_percentage: f64,
    pub tier: Tier,
}

/// Compute a recommendation from aggregated counts.
///
/// Callers must guarantee at least one review; `summarize` never hands out
/// empty aggregates, so a zero total here is a logic error upstream.
pub fn recommend(positive_count: u64, negative_count: u64) -> Recommendation {
    let total = positive_count + negative_count;
    debug_assert!(total > 0, "recommend called with zero reviews");

    let fraction = positive_count as f64 / total as f64;
    let percentage = fraction * 100.0;
    Recommendation {
        score: round1(fraction * 10.0),
        positive_percentage: round1(percentage),
        tier: Tier::from_positive_percentage(percentage),
    }
}
