//! Human-auditable scoring breakdowns.
//!
//! A breakdown reconstructs how a market scored: the per-dimension affinity,
//! weight, and contribution behind the base score, followed by the recorded
//! modifiers from the modulation pass. Breakdowns replay the recorded random
//! draw rather than redrawing, so the explanation always matches what was
//! served.

use currents_core::{Market, MarketTags, UserProfile};

use crate::{
    ACTOR_WEIGHT, ANGLE_WEIGHT, CATEGORY_WEIGHT, EVENT_TYPE_WEIGHT, Modulation,
};

/// Final scores at or above this threshold classify as exploitation.
pub const EXPLOITATION_THRESHOLD: f32 = 0.5;

/// Whether a served item was exploitation or exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Classification {
    /// High-confidence match to learned interests.
    Exploitation,
    /// Deliberate or low-confidence surfacing.
    Exploration,
}

impl Classification {
    /// Classify a final score.
    #[must_use]
    pub fn from_score(score: f32) -> Self {
        if score >= EXPLOITATION_THRESHOLD {
            Self::Exploitation
        } else {
            Self::Exploration
        }
    }

    /// Return the classification as a lowercase `&str`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploitation => "exploitation",
            Self::Exploration => "exploration",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dimension's contribution to the base score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DimensionScore {
    /// Dimension label: `category`, `actors`, `angle`, or `event_type`.
    pub dimension: String,
    /// Tag value(s) the affinity was looked up for.
    pub value: String,
    /// Affinity read from the profile (mean affinity for actors).
    pub affinity: f32,
    /// Weight of this dimension in the weighted sum.
    pub weight: f32,
    /// `affinity x weight`, before normalisation.
    pub contribution: f32,
}

/// A modifier as shown to a human: its signed delta and a reason string.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedModifier {
    /// Signed change to the score.
    pub delta: f32,
    /// Why the score changed.
    pub reason: String,
}

/// The complete scoring audit for one served market.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreBreakdown {
    /// Market the breakdown describes.
    pub market_id: String,
    /// Per-dimension affinities, weights, and contributions.
    pub dimensions: Vec<DimensionScore>,
    /// Sum of the weights actually applied; contributions divided by this
    /// give the base score.
    pub total_weight: f32,
    /// Normalised base relevance score.
    pub base_score: f32,
    /// Modifiers in application order, replayed from the recorded pass.
    pub modifiers: Vec<AppliedModifier>,
    /// Score after all modifiers.
    pub final_score: f32,
    /// Exploitation/exploration classification of the final score.
    pub classification: Classification,
}

impl ScoreBreakdown {
    /// Reconstruct the audit for a market from its recorded modulation.
    ///
    /// Performs no random draws: the blend draw is read back from the
    /// recorded modifiers.
    #[must_use]
    pub fn from_modulation(
        market: &Market,
        tags: &MarketTags,
        profile: &UserProfile,
        modulation: &Modulation,
    ) -> Self {
        let dimensions = dimension_rows(tags, profile);
        let total_weight: f32 = dimensions.iter().map(|row| row.weight).sum();
        Self {
            market_id: market.id.clone(),
            dimensions,
            total_weight,
            base_score: modulation.base,
            modifiers: modulation
                .modifiers
                .iter()
                .map(|modifier| AppliedModifier {
                    delta: modifier.delta,
                    reason: modifier.reason(),
                })
                .collect(),
            final_score: modulation.score,
            classification: Classification::from_score(modulation.score),
        }
    }
}

/// Compute the per-dimension rows behind a base score.
///
/// The actor row is omitted when the market tags no actors, redistributing
/// its weight across the remaining dimensions via normalisation.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "dimension rows multiply affinities by their weights"
)]
pub(crate) fn dimension_rows(tags: &MarketTags, profile: &UserProfile) -> Vec<DimensionScore> {
    let mut rows = Vec::with_capacity(4);

    let category_affinity = profile.interests.categories.affinity(&tags.category);
    rows.push(DimensionScore {
        dimension: "category".to_owned(),
        value: tags.category.clone(),
        affinity: category_affinity,
        weight: CATEGORY_WEIGHT,
        contribution: category_affinity * CATEGORY_WEIGHT,
    });

    if !tags.actors.is_empty() {
        let sum: f32 = tags
            .actors
            .iter()
            .map(|actor| profile.interests.actors.affinity(actor))
            .sum();
        let mean = sum / tags.actors.len() as f32;
        rows.push(DimensionScore {
            dimension: "actors".to_owned(),
            value: tags.actors.join(", "),
            affinity: mean,
            weight: ACTOR_WEIGHT,
            contribution: mean * ACTOR_WEIGHT,
        });
    }

    let angle_affinity = profile.interests.angles.affinity(&tags.angle);
    rows.push(DimensionScore {
        dimension: "angle".to_owned(),
        value: tags.angle.clone(),
        affinity: angle_affinity,
        weight: ANGLE_WEIGHT,
        contribution: angle_affinity * ANGLE_WEIGHT,
    });

    let event_affinity = profile.interests.event_types.affinity(&tags.event_type);
    rows.push(DimensionScore {
        dimension: "event_type".to_owned(),
        value: tags.event_type.clone(),
        affinity: event_affinity,
        weight: EVENT_TYPE_WEIGHT,
        contribution: event_affinity * EVENT_TYPE_WEIGHT,
    });

    rows
}
