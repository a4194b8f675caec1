//! Score markets for a user profile.
//!
//! The `Scorer` trait assigns a base relevance score to a [`Market`] given
//! its [`MarketTags`] and the caller's [`UserProfile`].

use crate::{Market, MarketTags, UserProfile};

/// Calculate a base relevance score for a market.
///
/// Higher scores indicate a better match between the market and the user's
/// learned interests. Implementations must be thread-safe (`Send` + `Sync`)
/// so scoring can run across threads. The method is infallible; implementers
/// must return `0.0` when no information is available — absent affinities
/// are zero interest, never an error.
///
/// Implementations must:
/// - Produce finite (`f32::is_finite`) scores.
/// - Return non-negative values.
/// - Normalise results to the range `0.0..=1.0`.
///
/// Use [`Scorer::sanitise`] to apply these guards.
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use currents_core::{Market, MarketTags, Scorer, UserProfile};
///
/// struct UnitScorer;
///
/// impl Scorer for UnitScorer {
///     fn score(&self, _market: &Market, _tags: &MarketTags, _profile: &UserProfile) -> f32 {
///         1.0
///     }
/// }
///
/// let closes: DateTime<Utc> = "2024-06-30T00:00:00Z".parse().expect("timestamp");
/// let market = Market::new("m1", "A?", "Politics", 10, closes);
/// let tags = MarketTags::new("Politics", ["Trump"], "Election Coverage", "Election");
/// let profile = UserProfile::new("u1", closes);
/// assert_eq!(UnitScorer.score(&market, &tags, &profile), 1.0);
/// ```
pub trait Scorer: Send + Sync {
    /// Return a base score for `market` according to `profile`.
    fn score(&self, market: &Market, tags: &MarketTags, profile: &UserProfile) -> f32;

    /// Clamp and validate a raw score.
    ///
    /// Returns `0.0` for non-finite values and clamps to `0.0..=1.0`.
    fn sanitise(score: f32) -> f32
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}
