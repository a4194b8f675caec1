//! Facade crate for the Currents feed-personalization engine.
//!
//! This crate re-exports the core domain types together with the default
//! relevance scorer and feed composer, so most callers only need a single
//! dependency.

#![forbid(unsafe_code)]

pub use currents_core::{
    Activity, ActivityKind, AffinityMap, CompositionRules, FeedEntry, FeedMetadata,
    InMemoryProfileStore, InMemoryTagCatalog, InterestProfile, Market, MarketTags,
    PersonalizedFeed, ProfileStore, ProfileSummary, RulesError, ScoredMarket, Scorer, SectionKind,
    TagCatalog, TrendingRanks, UserProfile, GUEST_KEY,
};

pub use currents_scorer::{Classification, Modulation, RelevanceScorer, ScoreBreakdown, Track};

pub use currents_feed::{
    ComposeError, ComposeRequest, ComposedFeed, FeedCache, FeedComposer, FeedExplanation,
    GuestRequest,
};
