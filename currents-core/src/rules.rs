//! Composition rules: the target section ratios and modulation knobs.

use thiserror::Error;

/// Tolerance used when checking that the section ratios sum to one.
const RATIO_SUM_TOLERANCE: f32 = 1e-6;

/// Tuning knobs for feed composition.
///
/// The defaults reproduce the production values: a 60/20/20 section split,
/// at most two consecutive same-category items, a 10% recency boost, and a
/// 90/10 exploitation/exploration blend.
///
/// # Examples
/// ```
/// use currents_core::CompositionRules;
///
/// let rules = CompositionRules::default().validate().expect("default rules are valid");
/// assert_eq!(rules.max_same_category_in_row, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionRules {
    /// Share of the feed devoted to personalized picks.
    pub personalized_ratio: f32,
    /// Share of the feed devoted to globally trending markets.
    pub trending_ratio: f32,
    /// Share of the feed devoted to exploration.
    pub exploration_ratio: f32,
    /// Longest permitted run of consecutive same-category items.
    pub max_same_category_in_row: usize,
    /// Multiplicative recency bonus for fresh markets (0.10 = +10%).
    pub recency_boost: f32,
    /// Weight of the base score in the exploitation blend (0.90 = 90/10).
    pub exploitation_weight: f32,
}

impl Default for CompositionRules {
    fn default() -> Self {
        Self {
            personalized_ratio: 0.60,
            trending_ratio: 0.20,
            exploration_ratio: 0.20,
            max_same_category_in_row: 2,
            recency_boost: 0.10,
            exploitation_weight: 0.90,
        }
    }
}

/// Errors returned by [`CompositionRules::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RulesError {
    /// The three section ratios do not sum to one.
    #[error("section ratios must sum to 1.0")]
    RatioSum,
    /// A ratio or weight fell outside `0.0..=1.0`.
    #[error("ratios and weights must lie within 0.0..=1.0")]
    WeightRange,
    /// The same-category run length was zero.
    #[error("max same-category run length must be positive")]
    ZeroRunLength,
}

impl CompositionRules {
    /// Validate the rules and return a copy.
    ///
    /// # Errors
    /// Returns [`RulesError`] when a ratio or weight is out of range, the
    /// ratios do not sum to one, or the diversity run length is zero.
    pub fn validate(self) -> Result<Self, RulesError> {
        let unit = 0.0..=1.0;
        let weights = [
            self.personalized_ratio,
            self.trending_ratio,
            self.exploration_ratio,
            self.recency_boost,
            self.exploitation_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || !unit.contains(w)) {
            return Err(RulesError::WeightRange);
        }
        let sum = self.personalized_ratio + self.trending_ratio + self.exploration_ratio;
        if (sum - 1.0).abs() > RATIO_SUM_TOLERANCE {
            return Err(RulesError::RatioSum);
        }
        if self.max_same_category_in_row == 0 {
            return Err(RulesError::ZeroRunLength);
        }
        Ok(self)
    }

    /// Split a requested total into per-section target sizes.
    ///
    /// Personalized and trending counts round down; exploration absorbs the
    /// remainder so the counts always sum to `total`.
    ///
    /// # Examples
    /// ```
    /// use currents_core::CompositionRules;
    ///
    /// let counts = CompositionRules::default().section_counts(15);
    /// assert_eq!(counts.personalized, 9);
    /// assert_eq!(counts.trending, 3);
    /// assert_eq!(counts.exploration, 3);
    /// ```
    #[must_use]
    pub fn section_counts(&self, total: usize) -> SectionCounts {
        let personalized = ratio_floor(total, self.personalized_ratio);
        let trending = ratio_floor(total, self.trending_ratio);
        let exploration = total.saturating_sub(personalized).saturating_sub(trending);
        SectionCounts {
            personalized,
            trending,
            exploration,
        }
    }
}

/// Per-section target sizes derived from [`CompositionRules::section_counts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionCounts {
    /// Target size of the personalized section.
    pub personalized: usize,
    /// Target size of the trending section.
    pub trending: usize,
    /// Target size of the exploration section; absorbs rounding remainder.
    pub exploration: usize,
}

fn ratio_floor(total: usize, ratio: f32) -> usize {
    let scaled = (total as f32) * ratio;
    if scaled <= 0.0 {
        return 0;
    }
    scaled.floor() as usize
}
