//! Streak-limited category diversity enforcement.
//!
//! A single left-to-right pass drops any entry that would extend a run of
//! same-category items past the configured limit. Dropped entries are not
//! deferred, retried, or backfilled; sections may end up short of their
//! targets. The pass runs once over the full hero-plus-sections
//! concatenation, so a streak started in one section can drop items from the
//! next.

use std::collections::HashSet;

use currents_core::FeedEntry;

/// An entry removed by diversity enforcement, with the reason it fell.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedEntry {
    /// The entry that was dropped.
    pub entry: FeedEntry,
    /// Why it was dropped.
    pub reason: String,
}

/// Result of one enforcement pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DiversityOutcome {
    /// Entries that survived, in their original order.
    pub kept: Vec<FeedEntry>,
    /// Entries that fell to the streak limit, in encounter order.
    pub dropped: Vec<DroppedEntry>,
}

/// Enforce the category streak limit over an ordered entry sequence.
///
/// `seed_category` pre-seeds the streak state with the hero's category so
/// the hero counts against the first run without being droppable itself.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::{FeedEntry, Market, SectionKind};
/// use currents_feed::enforce_diversity;
///
/// let closes: DateTime<Utc> = "2024-06-30T00:00:00Z".parse().expect("timestamp");
/// let entry = |id: &str, category: &str| FeedEntry {
///     section: SectionKind::Personalized,
///     market: Market::new(id, "Q?", category, 1, closes),
///     reason: String::new(),
/// };
/// let entries = vec![
///     entry("m1", "Crypto"),
///     entry("m2", "Crypto"),
///     entry("m3", "Crypto"),
///     entry("m4", "Politics"),
/// ];
/// let outcome = enforce_diversity(entries, None, 2);
/// assert_eq!(outcome.kept.len(), 3);
/// assert_eq!(outcome.dropped.len(), 1);
/// ```
#[must_use]
pub fn enforce_diversity(
    entries: Vec<FeedEntry>,
    seed_category: Option<&str>,
    max_run: usize,
) -> DiversityOutcome {
    let mut kept = Vec::with_capacity(entries.len());
    let mut dropped = Vec::new();
    let mut last_category: Option<String> = seed_category.map(ToOwned::to_owned);
    let mut streak: usize = usize::from(seed_category.is_some());

    for entry in entries {
        if last_category.as_deref() == Some(entry.market.category.as_str()) {
            if streak >= max_run {
                let reason = format!(
                    "category {} already ran {streak} in a row",
                    entry.market.category
                );
                dropped.push(DroppedEntry { entry, reason });
                continue;
            }
            streak += 1;
        } else {
            last_category = Some(entry.market.category.clone());
            streak = 1;
        }
        kept.push(entry);
    }

    DiversityOutcome { kept, dropped }
}

/// Distinct categories divided by sequence length, in `[0.0, 1.0]`.
///
/// Returns `0.0` for an empty sequence. Descriptive only; nothing enforces
/// a minimum.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the diversity metric is a ratio of two counts"
)]
#[must_use]
pub fn diversity_score<'a, I>(categories: I) -> f32
where
    I: IntoIterator<Item = &'a str>,
{
    let mut distinct = HashSet::new();
    let mut total = 0_usize;
    for category in categories {
        distinct.insert(category);
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    distinct.len() as f32 / total as f32
}
