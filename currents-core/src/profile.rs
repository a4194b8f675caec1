//! Interest profiles: learned per-dimension affinities in `[0.0, 1.0]`
//! alongside a bounded recent-activity log.
//!
//! Profiles are owned and mutated by an external store; the engine reads
//! them. Absent affinities resolve to zero rather than an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Maximum number of entries retained in a profile's activity log.
pub const RECENT_ACTIVITY_LIMIT: usize = 50;

/// How many actors a [`ProfileSummary`] retains.
const SUMMARY_ACTOR_LIMIT: usize = 5;

/// Learned affinities for one tag dimension, keyed by tag value.
///
/// Inserted values are clamped into `0.0..=1.0`; unknown keys read as
/// `0.0`.
///
/// # Examples
/// ```
/// use currents_core::AffinityMap;
///
/// let map = AffinityMap::new().with("Crypto", 0.92);
/// assert_eq!(map.affinity("Crypto"), 0.92);
/// assert_eq!(map.affinity("Sports"), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AffinityMap {
    weights: HashMap<String, f32>,
}

impl AffinityMap {
    /// Construct an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the affinity for a tag value, defaulting to `0.0` when the
    /// value is unknown.
    #[must_use]
    pub fn affinity(&self, value: &str) -> f32 {
        self.weights.get(value).copied().unwrap_or(0.0)
    }

    /// Insert or update an affinity.
    ///
    /// Values are clamped into `0.0..=1.0`; non-finite values read as zero
    /// interest.
    pub fn set(&mut self, value: impl Into<String>, affinity: f32) {
        let clamped = if affinity.is_finite() {
            affinity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.weights.insert(value.into(), clamped);
    }

    /// Add an affinity while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, value: impl Into<String>, affinity: f32) -> Self {
        self.set(value, affinity);
        self
    }

    /// Iterate over `(value, affinity)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.weights.iter().map(|(value, &weight)| (value.as_str(), weight))
    }

    /// Return up to `limit` entries ordered by descending affinity.
    ///
    /// Ties break on the tag value so the ordering is deterministic.
    #[must_use]
    pub fn top(&self, limit: usize) -> Vec<AffinityEntry> {
        let mut entries: Vec<AffinityEntry> = self
            .weights
            .iter()
            .map(|(value, &weight)| AffinityEntry {
                name: value.clone(),
                affinity: weight,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.affinity
                .total_cmp(&a.affinity)
                .then_with(|| a.name.cmp(&b.name))
        });
        entries.truncate(limit);
        entries
    }

    /// Number of tag values with a recorded affinity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the map holds no affinities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// A named affinity, used in profile summaries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffinityEntry {
    /// Tag value the affinity applies to.
    pub name: String,
    /// Learned interest weight in `[0.0, 1.0]`.
    pub affinity: f32,
}

/// The four affinity dimensions the relevance scorer reads.
///
/// # Examples
/// ```
/// use currents_core::InterestProfile;
///
/// let interests = InterestProfile::new()
///     .with_category("Crypto", 0.92)
///     .with_actor("Bitcoin", 0.95);
/// assert_eq!(interests.categories.affinity("Crypto"), 0.92);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterestProfile {
    /// Category affinities, e.g. "Crypto" → 0.92.
    pub categories: AffinityMap,
    /// Actor affinities, e.g. "Bitcoin" → 0.95.
    pub actors: AffinityMap,
    /// Angle affinities, e.g. "Controversy" → 0.65.
    pub angles: AffinityMap,
    /// Event-type affinities, e.g. "Election" → 0.45.
    pub event_types: AffinityMap,
}

impl InterestProfile {
    /// Construct an empty interest profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category affinity while returning `self` for chaining.
    #[must_use]
    pub fn with_category(mut self, value: impl Into<String>, affinity: f32) -> Self {
        self.categories.set(value, affinity);
        self
    }

    /// Add an actor affinity while returning `self` for chaining.
    #[must_use]
    pub fn with_actor(mut self, value: impl Into<String>, affinity: f32) -> Self {
        self.actors.set(value, affinity);
        self
    }

    /// Add an angle affinity while returning `self` for chaining.
    #[must_use]
    pub fn with_angle(mut self, value: impl Into<String>, affinity: f32) -> Self {
        self.angles.set(value, affinity);
        self
    }

    /// Add an event-type affinity while returning `self` for chaining.
    #[must_use]
    pub fn with_event_type(mut self, value: impl Into<String>, affinity: f32) -> Self {
        self.event_types.set(value, affinity);
        self
    }
}

/// Kind of interaction recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ActivityKind {
    /// The user viewed the market.
    View,
    /// The user voted on the market.
    Vote,
    /// The user shared the market.
    Share,
    /// The user commented on the market.
    Comment,
}

impl ActivityKind {
    /// Return the kind as a lowercase `&str`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Vote => "vote",
            Self::Share => "share",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded interaction with a market.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Activity {
    /// Market the interaction targeted.
    pub market_id: String,
    /// What the user did.
    pub kind: ActivityKind,
    /// When the interaction happened.
    pub timestamp: DateTime<Utc>,
    /// Category of the market at interaction time, when known.
    pub category: Option<String>,
}

/// A user's learned interests plus their recent activity.
///
/// The activity log is bounded to [`RECENT_ACTIVITY_LIMIT`] entries and kept
/// most-recent-first.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::{InterestProfile, UserProfile};
///
/// let updated: DateTime<Utc> = "2024-02-14T12:00:00Z".parse().expect("timestamp");
/// let profile = UserProfile::new("user-crypto-1", updated)
///     .with_interests(InterestProfile::new().with_category("Crypto", 0.92));
/// assert_eq!(profile.user_id, "user-crypto-1");
/// assert!(!profile.has_seen("m2"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserProfile {
    /// Stable user identifier; doubles as the feed cache key.
    pub user_id: String,
    /// Learned affinities across the four tag dimensions.
    pub interests: InterestProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    recent_activity: Vec<Activity>,
    /// When the profile was last mutated by its owning store.
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    /// Construct a profile with no interests or activity.
    #[must_use]
    pub fn new(user_id: impl Into<String>, last_updated: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            interests: InterestProfile::new(),
            recent_activity: Vec::new(),
            last_updated,
        }
    }

    /// Replace the interest dimensions while returning `self` for chaining.
    #[must_use]
    pub fn with_interests(mut self, interests: InterestProfile) -> Self {
        self.interests = interests;
        self
    }

    /// Record an interaction at the head of the activity log.
    ///
    /// The log is truncated to [`RECENT_ACTIVITY_LIMIT`] entries and
    /// `last_updated` advances to the activity timestamp.
    pub fn record_activity(&mut self, activity: Activity) {
        self.last_updated = activity.timestamp;
        self.recent_activity.insert(0, activity);
        self.recent_activity.truncate(RECENT_ACTIVITY_LIMIT);
    }

    /// The activity log, most recent first.
    #[must_use]
    pub fn recent_activity(&self) -> &[Activity] {
        &self.recent_activity
    }

    /// Whether the user has interacted with the given market.
    #[must_use]
    pub fn has_seen(&self, market_id: &str) -> bool {
        self.recent_activity
            .iter()
            .any(|activity| activity.market_id == market_id)
    }

    /// Produce the snapshot embedded in feed metadata: every category
    /// affinity plus the top actors, ordered by descending weight.
    #[must_use]
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            categories: self.interests.categories.top(self.interests.categories.len()),
            top_actors: self.interests.actors.top(SUMMARY_ACTOR_LIMIT),
        }
    }
}

/// Compact profile snapshot recorded alongside a composed feed.
///
/// Guests carry an empty summary.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileSummary {
    /// All category affinities, strongest first.
    pub categories: Vec<AffinityEntry>,
    /// The strongest actor affinities, at most five.
    pub top_actors: Vec<AffinityEntry>,
}

impl ProfileSummary {
    /// The empty summary used for guest feeds.
    #[must_use]
    pub fn guest() -> Self {
        Self::default()
    }
}
