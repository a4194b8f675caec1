//! Core domain types for the Currents feed engine.
//!
//! The crate defines the data model shared by the scoring and composition
//! crates: market records and their tag tuples, user interest profiles,
//! composition rules, trending ranks, and the composed feed itself. It also
//! declares the trait seams ([`Scorer`], [`ProfileStore`], [`TagCatalog`])
//! through which external collaborators supply data to the engine.
//!
//! Scoring and composition live in `currents-scorer` and `currents-feed`;
//! this crate stays free of randomness and caching so the model remains
//! deterministic and trivially testable.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod feed;
mod market;
mod profile;
mod providers;
mod rules;
mod scored;
mod scorer;
mod tags;
mod trending;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use feed::{FeedEntry, FeedMetadata, GUEST_KEY, PersonalizedFeed};
pub use market::Market;
pub use profile::{
    Activity, ActivityKind, AffinityEntry, AffinityMap, InterestProfile, ProfileSummary,
    RECENT_ACTIVITY_LIMIT, UserProfile,
};
pub use providers::{InMemoryProfileStore, InMemoryTagCatalog, ProfileStore, TagCatalog};
pub use rules::{CompositionRules, RulesError, SectionCounts};
pub use scored::{ScoredMarket, SectionKind};
pub use scorer::Scorer;
pub use tags::MarketTags;
pub use trending::{TRENDING_SECTION_CUTOFF, TrendingRanks};
