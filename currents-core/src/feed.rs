//! The composed feed: a hero slot plus one tagged collection of section
//! entries.
//!
//! Sections are not stored as three parallel arrays; each entry carries its
//! section label so diversity enforcement and serialization can walk a
//! single sequence. Accessors re-split the collection per section.

use chrono::{DateTime, Utc};

use crate::{Market, ProfileSummary, SectionKind};

/// Cache and metadata key used for anonymous visitors.
pub const GUEST_KEY: &str = "guest";

/// One served market together with its section label and scoring reason.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedEntry {
    /// Section the entry is served under.
    pub section: SectionKind,
    /// The market record itself.
    pub market: Market,
    /// Human-readable scoring or selection reason.
    pub reason: String,
}

/// Bookkeeping recorded alongside a composed feed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedMetadata {
    /// When the feed was composed.
    pub composed_at: DateTime<Utc>,
    /// Key the feed was composed for: a user id or [`GUEST_KEY`].
    pub key: String,
    /// Snapshot of the profile that drove scoring; empty for guests.
    pub profile_summary: ProfileSummary,
    /// Distinct categories divided by output length, in `[0.0, 1.0]`.
    /// Descriptive only; not enforced.
    pub diversity_score: f32,
}

/// A fully composed, ready-to-serve feed.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::{
///     FeedEntry, FeedMetadata, Market, PersonalizedFeed, ProfileSummary, SectionKind,
/// };
///
/// let now: DateTime<Utc> = "2024-02-14T12:00:00Z".parse().expect("timestamp");
/// let market = Market::new("m1", "A?", "Politics", 10, now);
/// let feed = PersonalizedFeed {
///     hero: Some(market.clone()),
///     entries: vec![FeedEntry {
///         section: SectionKind::Trending,
///         market,
///         reason: "trending rank 1".to_owned(),
///     }],
///     metadata: FeedMetadata {
///         composed_at: now,
///         key: "u1".to_owned(),
///         profile_summary: ProfileSummary::guest(),
///         diversity_score: 1.0,
///     },
/// };
/// assert_eq!(feed.section(SectionKind::Trending).count(), 1);
/// assert_eq!(feed.section(SectionKind::Personalized).count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersonalizedFeed {
    /// The single highest-scored market, when any market was available.
    /// May also appear inside a section.
    pub hero: Option<Market>,
    /// Section entries in served order; the concatenation of the
    /// personalized, trending, and exploration sections.
    pub entries: Vec<FeedEntry>,
    /// Compose-time bookkeeping.
    pub metadata: FeedMetadata,
}

impl PersonalizedFeed {
    /// Iterate over the markets served under one section, in order.
    pub fn section(&self, kind: SectionKind) -> impl Iterator<Item = &Market> {
        self.entries
            .iter()
            .filter(move |entry| entry.section == kind)
            .map(|entry| &entry.market)
    }

    /// Markets matched to the user's interests.
    pub fn personalized(&self) -> impl Iterator<Item = &Market> {
        self.section(SectionKind::Personalized)
    }

    /// Markets popular across the platform.
    pub fn trending(&self) -> impl Iterator<Item = &Market> {
        self.section(SectionKind::Trending)
    }

    /// Deliberately novel markets.
    pub fn exploration(&self) -> impl Iterator<Item = &Market> {
        self.section(SectionKind::Exploration)
    }

    /// Every served market: the hero (when present) followed by the section
    /// entries.
    pub fn markets(&self) -> impl Iterator<Item = &Market> {
        self.hero
            .iter()
            .chain(self.entries.iter().map(|entry| &entry.market))
    }

    /// Number of section entries, excluding the hero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the feed serves nothing at all, hero included.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hero.is_none() && self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        "2024-02-14T12:00:00Z".parse().expect("timestamp")
    }

    fn market(id: &str, category: &str) -> Market {
        Market::new(id, "Question?", category, 10, now())
    }

    fn entry(id: &str, category: &str, section: SectionKind) -> FeedEntry {
        FeedEntry {
            section,
            market: market(id, category),
            reason: String::new(),
        }
    }

    fn feed(hero: Option<Market>, entries: Vec<FeedEntry>) -> PersonalizedFeed {
        PersonalizedFeed {
            hero,
            entries,
            metadata: FeedMetadata {
                composed_at: now(),
                key: "u1".to_owned(),
                profile_summary: ProfileSummary::guest(),
                diversity_score: 0.0,
            },
        }
    }

    #[rstest]
    fn sections_split_by_label() {
        let feed = feed(
            None,
            vec![
                entry("m1", "Politics", SectionKind::Personalized),
                entry("m2", "Crypto", SectionKind::Trending),
                entry("m3", "Sports", SectionKind::Personalized),
            ],
        );
        let personalized: Vec<&str> =
            feed.personalized().map(|m| m.id.as_str()).collect();
        assert_eq!(personalized, ["m1", "m3"]);
        assert_eq!(feed.trending().count(), 1);
        assert_eq!(feed.exploration().count(), 0);
    }

    #[rstest]
    fn markets_include_hero_first() {
        let feed = feed(
            Some(market("hero", "Crypto")),
            vec![entry("m1", "Politics", SectionKind::Trending)],
        );
        let ids: Vec<&str> = feed.markets().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["hero", "m1"]);
    }

    #[rstest]
    fn empty_feed_reports_empty() {
        let feed = feed(None, Vec::new());
        assert!(feed.is_empty());
        assert_eq!(feed.len(), 0);
    }
}
