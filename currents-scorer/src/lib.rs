//! Relevance scoring for Currents markets.
//!
//! The crate provides two complementary capabilities:
//! - **Base relevance scoring** combines per-dimension interest affinities
//!   from a [`UserProfile`](currents_core::UserProfile) with a market's tag
//!   tuple into a deterministic score in `0.0..=1.0`. It implements the
//!   [`Scorer`](currents_core::Scorer) trait so callers can plug the scorer
//!   into the feed composer.
//! - **Score modulation** blends the base score with an injected randomness
//!   source (the exploitation/exploration trade-off), then applies recency
//!   and trending boosts in sequence. Every random draw and applied boost is
//!   recorded so a scoring breakdown can replay the pass exactly instead of
//!   redrawing.
//!
//! # Examples
//!
//! ```
//! use currents_core::{MarketTags, Scorer, UserProfile};
//! use currents_scorer::RelevanceScorer;
//!
//! let profile = UserProfile::new(
//!     "u1",
//!     "2024-02-15T12:00:00Z".parse().expect("timestamp"),
//! )
//! .with_interests(
//!     currents_core::InterestProfile::new()
//!         .with_category("Crypto", 0.92)
//!         .with_actor("Bitcoin", 0.95)
//!         .with_angle("Price Prediction", 0.90)
//!         .with_event_type("Price Movement", 0.92),
//! );
//! let market = currents_core::Market::new(
//!     "m2",
//!     "Will Bitcoin reach $100k?",
//!     "Crypto",
//!     900,
//!     "2024-06-30T00:00:00Z".parse().expect("timestamp"),
//! );
//! let tags = MarketTags::new("Crypto", ["Bitcoin"], "Price Prediction", "Price Movement");
//!
//! let base = RelevanceScorer.score(&market, &tags, &profile);
//! assert!((base - 0.925).abs() < 1e-4);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

use currents_core::{Market, MarketTags, Scorer, UserProfile};

mod explain;
mod modulate;

pub use explain::{
    AppliedModifier, Classification, DimensionScore, EXPLOITATION_THRESHOLD, ScoreBreakdown,
};
pub use modulate::{
    EXPLORATION_BASE_WEIGHT, Modifier, ModifierKind, Modulation, ScoreOutcome, ScoringPass, Track,
    age_in_days, modulate,
};

/// Weight of the category affinity in the base score.
pub(crate) const CATEGORY_WEIGHT: f32 = 0.35;
/// Weight of the mean actor affinity; omitted when a market tags no actors.
pub(crate) const ACTOR_WEIGHT: f32 = 0.30;
/// Weight of the angle affinity.
pub(crate) const ANGLE_WEIGHT: f32 = 0.20;
/// Weight of the event-type affinity.
pub(crate) const EVENT_TYPE_WEIGHT: f32 = 0.15;

/// Deterministic base relevance scorer.
///
/// Computes a weighted sum over the four tag dimensions, normalised by the
/// weights actually applied: when a market tags no actors, the actor term is
/// omitted and its weight redistributed across the remaining dimensions.
/// Unknown tag values contribute zero affinity.
#[derive(Debug, Default, Clone, Copy)]
pub struct RelevanceScorer;

impl Scorer for RelevanceScorer {
    #[expect(
        clippy::float_arithmetic,
        reason = "relevance scoring normalises a weighted affinity sum"
    )]
    fn score(&self, _market: &Market, tags: &MarketTags, profile: &UserProfile) -> f32 {
        let rows = explain::dimension_rows(tags, profile);
        let total_weight: f32 = rows.iter().map(|row| row.weight).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let total: f32 = rows.iter().map(|row| row.contribution).sum();
        Self::sanitise(total / total_weight)
    }
}
