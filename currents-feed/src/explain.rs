//! Feed-level debug explanations.
//!
//! An explanation pairs every served market with its scoring breakdown,
//! reports target versus actual section ratios, and traces what diversity
//! enforcement did: the pre-enforcement ranking, each dropped item with its
//! reason, and the served order. Explanations are built from the recorded
//! compose pass, never from a rescoring run, so they describe exactly the
//! feed that was served.

use currents_core::SectionKind;
use currents_scorer::ScoreBreakdown;

/// A served market with its section label and scoring breakdown.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplainedEntry {
    /// Section the market was served under.
    pub section: SectionKind,
    /// Market the breakdown describes.
    pub market_id: String,
    /// The full scoring audit.
    pub breakdown: ScoreBreakdown,
}

/// Share of the served feed held by each section.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionRatios {
    /// Personalized share.
    pub personalized: f32,
    /// Trending share.
    pub trending: f32,
    /// Exploration share.
    pub exploration: f32,
}

/// Target composition ratios next to what was actually served.
///
/// The two can diverge when candidate pools run dry or diversity
/// enforcement drops entries.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioReport {
    /// Ratios the composition rules asked for.
    pub target: SectionRatios,
    /// Ratios of the served sections.
    pub actual: SectionRatios,
}

/// One item in the pre-enforcement ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedItem {
    /// Market identifier.
    pub market_id: String,
    /// Category driving diversity enforcement.
    pub category: String,
    /// Final score at ranking time.
    pub score: f32,
    /// Destination section; `None` marks the hero slot.
    pub section: Option<SectionKind>,
}

/// An item removed by diversity enforcement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DroppedItem {
    /// Market identifier.
    pub market_id: String,
    /// Category that hit the streak limit.
    pub category: String,
    /// Why the item fell.
    pub reason: String,
}

/// What diversity enforcement saw and did.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiversityTrace {
    /// The full concatenation before enforcement: hero first, then the
    /// sections in serve order.
    pub ranked: Vec<RankedItem>,
    /// Items dropped by the streak limit, in encounter order.
    pub dropped: Vec<DroppedItem>,
    /// Market ids actually served, hero first.
    pub served: Vec<String>,
}

/// The complete audit of one compose pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedExplanation {
    /// Breakdown for the hero, when the hero was scorable.
    pub hero: Option<ScoreBreakdown>,
    /// Breakdown per served section entry, in serve order.
    pub items: Vec<ExplainedEntry>,
    /// Target versus served section ratios.
    pub ratios: RatioReport,
    /// Diversity enforcement trace.
    pub trace: DiversityTrace,
}
