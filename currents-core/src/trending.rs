//! Trending ranks: a global, profile-independent ordering by engagement.

use std::collections::HashMap;

use crate::Market;

/// Markets at or above this global rank are eligible for the trending
/// section.
pub const TRENDING_SECTION_CUTOFF: u32 = 10;

/// Ordinal trending positions keyed by market id, 1-based.
///
/// Ranks come from an external engagement pipeline; the simple built-in
/// calculator orders markets by descending engagement count. Markets absent
/// from the mapping are unranked.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::{Market, TrendingRanks};
///
/// let closes: DateTime<Utc> = "2024-06-30T00:00:00Z".parse().expect("timestamp");
/// let markets = vec![
///     Market::new("m1", "A?", "Politics", 40, closes),
///     Market::new("m2", "B?", "Crypto", 90, closes),
/// ];
/// let ranks = TrendingRanks::from_engagement(&markets);
/// assert_eq!(ranks.rank("m2"), Some(1));
/// assert_eq!(ranks.rank("m1"), Some(2));
/// assert_eq!(ranks.rank("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrendingRanks {
    ranks: HashMap<String, u32>,
}

impl TrendingRanks {
    /// Rank markets by descending engagement count.
    ///
    /// Ties break on the market id so the ordering is deterministic.
    #[must_use]
    pub fn from_engagement(markets: &[Market]) -> Self {
        let mut ordered: Vec<&Market> = markets.iter().collect();
        ordered.sort_by(|a, b| {
            b.engagement
                .cmp(&a.engagement)
                .then_with(|| a.id.cmp(&b.id))
        });
        let ranks = ordered
            .iter()
            .enumerate()
            .map(|(index, market)| (market.id.clone(), u32::try_from(index + 1).unwrap_or(u32::MAX)))
            .collect();
        Self { ranks }
    }

    /// Adopt ranks computed by an external calculator.
    #[must_use]
    pub fn from_ranks(ranks: HashMap<String, u32>) -> Self {
        Self { ranks }
    }

    /// The global rank of a market, if it is ranked at all.
    #[must_use]
    pub fn rank(&self, market_id: &str) -> Option<u32> {
        self.ranks.get(market_id).copied()
    }

    /// Number of ranked markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Whether no markets are ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}
