//! Data access traits for the engine's external collaborators.
//!
//! Profiles and tag catalogs are owned elsewhere; the engine consumes them
//! through read-only seams. The in-memory implementations back the CLI
//! fixtures and tests; production callers adapt their own stores.

use std::collections::HashMap;

use crate::{MarketTags, UserProfile};

/// Read-only access to user interest profiles.
///
/// Absence of a profile is a NotFound condition for the caller to handle —
/// the engine never substitutes a guest feed on its own.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::{InMemoryProfileStore, ProfileStore, UserProfile};
///
/// let updated: DateTime<Utc> = "2024-02-14T12:00:00Z".parse().expect("timestamp");
/// let store = InMemoryProfileStore::from_profiles([UserProfile::new("u1", updated)]);
/// assert!(store.profile("u1").is_some());
/// assert!(store.profile("u2").is_none());
/// ```
pub trait ProfileStore: Send + Sync {
    /// Look up the profile for a user key, if one exists.
    fn profile(&self, key: &str) -> Option<UserProfile>;
}

/// Read-only access to per-market tag tuples.
///
/// Markets absent from the catalog are silently excluded from scoring.
pub trait TagCatalog: Send + Sync {
    /// Look up the tags for a market, if the catalog covers it.
    fn tags(&self, market_id: &str) -> Option<&MarketTags>;
}

/// In-memory [`ProfileStore`] keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: HashMap<String, UserProfile>,
}

impl InMemoryProfileStore {
    /// Build a store from a collection of profiles, keyed by their user id.
    #[must_use]
    pub fn from_profiles<I>(profiles: I) -> Self
    where
        I: IntoIterator<Item = UserProfile>,
    {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.user_id.clone(), profile))
                .collect(),
        }
    }

    /// Number of stored profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store holds no profiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for InMemoryProfileStore {
    fn profile(&self, key: &str) -> Option<UserProfile> {
        self.profiles.get(key).cloned()
    }
}

/// In-memory [`TagCatalog`] keyed by market id.
///
/// # Examples
/// ```
/// use currents_core::{InMemoryTagCatalog, MarketTags, TagCatalog};
///
/// let catalog = InMemoryTagCatalog::from_entries([(
///     "m2".to_owned(),
///     MarketTags::new("Crypto", ["Bitcoin"], "Price Prediction", "Price Movement"),
/// )]);
/// assert!(catalog.tags("m2").is_some());
/// assert!(catalog.tags("m9").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagCatalog {
    tags: HashMap<String, MarketTags>,
}

impl InMemoryTagCatalog {
    /// Build a catalog from `(market id, tags)` pairs.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, MarketTags)>,
    {
        Self {
            tags: entries.into_iter().collect(),
        }
    }

    /// Insert or replace the tags for one market.
    pub fn insert(&mut self, market_id: impl Into<String>, tags: MarketTags) {
        self.tags.insert(market_id.into(), tags);
    }

    /// Number of tagged markets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagCatalog for InMemoryTagCatalog {
    fn tags(&self, market_id: &str) -> Option<&MarketTags> {
        self.tags.get(market_id)
    }
}
