//! The feed composer: scoring, partitioning, diversity, and caching for one
//! compose call.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use currents_core::{
    CompositionRules, FeedEntry, FeedMetadata, GUEST_KEY, Market, PersonalizedFeed,
    ProfileSummary, Scorer, SectionKind, TRENDING_SECTION_CUTOFF, TagCatalog, TrendingRanks,
    UserProfile,
};
use currents_scorer::{RelevanceScorer, ScoreBreakdown, ScoreOutcome, ScoringPass, Track};

use crate::{
    cache::FeedCache,
    diversity::{DiversityOutcome, diversity_score, enforce_diversity},
    error::ComposeError,
    explain::{
        DiversityTrace, DroppedItem, ExplainedEntry, FeedExplanation, RankedItem, RatioReport,
        SectionRatios,
    },
};

/// Default number of markets a composed feed targets.
pub const DEFAULT_TOTAL: usize = 15;

/// Exploit-track scores must clear this floor to enter the personalized
/// section.
const PERSONALIZED_SCORE_FLOOR: f32 = 0.2;

/// Guest feed: share filled from trending ranks.
const GUEST_TRENDING_RATIO: f32 = 0.50;
/// Guest feed: share filled from the most recent closing dates.
const GUEST_RECENT_RATIO: f32 = 0.20;

/// Inputs for one personalized compose call.
///
/// The caller supplies `now` and `seed` explicitly so cache freshness, age
/// proxies, and the randomness stream are all reproducible under test.
pub struct ComposeRequest<'a> {
    /// Cache and metadata key; normally the user id.
    pub key: &'a str,
    /// Profile driving relevance scoring. Looking the profile up (and
    /// handling an unknown key) is the caller's job.
    pub profile: &'a UserProfile,
    /// The flat candidate collection.
    pub markets: &'a [Market],
    /// Tag catalog; untagged markets are excluded from scoring.
    pub tags: &'a dyn TagCatalog,
    /// Global trending ranks.
    pub ranks: &'a TrendingRanks,
    /// Requested feed size, hero excluded; see [`DEFAULT_TOTAL`].
    pub total: usize,
    /// Seed for the per-call randomness stream.
    pub seed: u64,
    /// Reference instant for cache freshness and the age proxy.
    pub now: DateTime<Utc>,
}

/// Inputs for one guest compose call. Guests have no profile, so no
/// scoring, seed, or tag catalog is involved.
#[derive(Debug, Clone, Copy)]
pub struct GuestRequest<'a> {
    /// The flat candidate collection.
    pub markets: &'a [Market],
    /// Global trending ranks.
    pub ranks: &'a TrendingRanks,
    /// Requested feed size, hero excluded.
    pub total: usize,
    /// Reference instant for cache freshness.
    pub now: DateTime<Utc>,
}

/// A feed together with the explanation of the pass that built it.
///
/// Guest feeds skip scoring entirely and carry no explanation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComposedFeed {
    /// The served feed.
    pub feed: PersonalizedFeed,
    /// Scoring audit matching the served feed exactly.
    pub explanation: Option<FeedExplanation>,
}

/// Composes ratio-bound feeds from scored candidates.
///
/// The composer owns its scorer, validated rules, and (optionally) an
/// injected [`FeedCache`]. Compose calls are `&self` and safe to run
/// concurrently for different keys; the cache is the only shared state.
///
/// # Examples
/// ```
/// use currents_feed::FeedComposer;
///
/// let composer = FeedComposer::with_defaults();
/// assert_eq!(composer.rules().max_same_category_in_row, 2);
/// ```
#[derive(Debug)]
pub struct FeedComposer<S: Scorer = RelevanceScorer> {
    scorer: S,
    rules: CompositionRules,
    cache: Option<FeedCache>,
}

impl FeedComposer<RelevanceScorer> {
    /// Construct a composer with the default scorer, production rules, and
    /// a five-minute cache.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            scorer: RelevanceScorer,
            rules: CompositionRules::default(),
            cache: Some(FeedCache::with_default_ttl()),
        }
    }
}

impl<S: Scorer> FeedComposer<S> {
    /// Construct a composer with a five-minute cache.
    ///
    /// # Errors
    /// Returns [`ComposeError::InvalidRules`] when the rules fail
    /// validation.
    pub fn new(scorer: S, rules: CompositionRules) -> Result<Self, ComposeError> {
        Self::build(scorer, rules, Some(FeedCache::with_default_ttl()))
    }

    /// Construct a composer around an explicitly configured cache.
    ///
    /// # Errors
    /// Returns [`ComposeError::InvalidRules`] when the rules fail
    /// validation.
    pub fn with_cache(scorer: S, rules: CompositionRules, cache: FeedCache) -> Result<Self, ComposeError> {
        Self::build(scorer, rules, Some(cache))
    }

    /// Construct a composer that always recomputes.
    ///
    /// Useful when the cache is unavailable: composition degrades to
    /// recomputation rather than failing.
    ///
    /// # Errors
    /// Returns [`ComposeError::InvalidRules`] when the rules fail
    /// validation.
    pub fn uncached(scorer: S, rules: CompositionRules) -> Result<Self, ComposeError> {
        Self::build(scorer, rules, None)
    }

    fn build(
        scorer: S,
        rules: CompositionRules,
        cache: Option<FeedCache>,
    ) -> Result<Self, ComposeError> {
        let validated = rules.validate()?;
        Ok(Self {
            scorer,
            rules: validated,
            cache,
        })
    }

    /// The validated rules the composer runs with.
    #[must_use]
    pub fn rules(&self) -> &CompositionRules {
        &self.rules
    }

    /// Compose a personalized feed, serving a cached snapshot when one is
    /// still fresh.
    #[must_use]
    pub fn compose(&self, request: &ComposeRequest<'_>) -> PersonalizedFeed {
        self.compose_explained(request).feed
    }

    /// Compose a personalized feed together with its scoring explanation.
    ///
    /// Feed and explanation are cached as one snapshot, so a cache hit
    /// explains exactly the feed it serves.
    #[must_use]
    pub fn compose_explained(&self, request: &ComposeRequest<'_>) -> ComposedFeed {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(request.key, request.now) {
                log::debug!("feed cache hit for key {}", request.key);
                return hit;
            }
        }
        let composed = self.build_personalized(request);
        if let Some(cache) = &self.cache {
            cache.insert(request.key, composed.clone(), request.now);
        }
        composed
    }

    /// Compose the profile-free guest feed, cached under [`GUEST_KEY`].
    ///
    /// Half the feed follows trending rank, a fifth follows the most recent
    /// closing dates, and the remainder is an unlabeled discovery bucket;
    /// all of it is served without scoring, so guests never trigger a
    /// profile lookup.
    #[must_use]
    pub fn compose_guest(&self, request: &GuestRequest<'_>) -> PersonalizedFeed {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(GUEST_KEY, request.now) {
                log::debug!("feed cache hit for key {GUEST_KEY}");
                return hit.feed;
            }
        }
        let feed = build_guest(request);
        if let Some(cache) = &self.cache {
            cache.insert(
                GUEST_KEY,
                ComposedFeed {
                    feed: feed.clone(),
                    explanation: None,
                },
                request.now,
            );
        }
        feed
    }

    /// Drop the cached snapshot for one key, e.g. after the user trades.
    pub fn invalidate(&self, key: &str) {
        if let Some(cache) = &self.cache {
            cache.clear(key);
        }
    }

    /// Drop every cached snapshot.
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.clear_all();
        }
    }

    fn build_personalized(&self, request: &ComposeRequest<'_>) -> ComposedFeed {
        let counts = self.rules.section_counts(request.total);
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        let pass = ScoringPass::new(&self.scorer, request.profile, &self.rules, request.now);

        // Exploit-track pass over every tagged market, best first.
        let mut outcomes: Vec<ScoreOutcome> = Vec::with_capacity(request.markets.len());
        for market in request.markets {
            let Some(tags) = request.tags.tags(&market.id) else {
                log::warn!(
                    "market {} is missing from the tag catalog; excluded from scoring",
                    market.id
                );
                continue;
            };
            let rank = request.ranks.rank(&market.id);
            outcomes.push(pass.score_market(market, tags, rank, Track::Exploit, &mut rng));
        }
        outcomes.sort_by(|a, b| b.scored.score.total_cmp(&a.scored.score));

        // Trending: globally ranked markets, highest score first.
        let trending_picks: Vec<&ScoreOutcome> = outcomes
            .iter()
            .filter(|outcome| {
                request
                    .ranks
                    .rank(&outcome.scored.market.id)
                    .is_some_and(|rank| rank <= TRENDING_SECTION_CUTOFF)
            })
            .take(counts.trending)
            .collect();
        let mut used: HashSet<&str> = trending_picks
            .iter()
            .map(|outcome| outcome.scored.market.id.as_str())
            .collect();

        // Personalized: remaining markets clearing the relevance floor.
        let personalized_picks: Vec<&ScoreOutcome> = outcomes
            .iter()
            .filter(|outcome| {
                !used.contains(outcome.scored.market.id.as_str())
                    && outcome.scored.score > PERSONALIZED_SCORE_FLOOR
            })
            .take(counts.personalized)
            .collect();
        used.extend(
            personalized_picks
                .iter()
                .map(|outcome| outcome.scored.market.id.as_str()),
        );

        // Exploration: everything left, re-scored with relevance suppressed.
        let mut exploration_picks: Vec<ScoreOutcome> = outcomes
            .iter()
            .filter(|outcome| !used.contains(outcome.scored.market.id.as_str()))
            .filter_map(|outcome| {
                request.tags.tags(&outcome.scored.market.id).map(|tags| {
                    pass.score_market(&outcome.scored.market, tags, None, Track::Explore, &mut rng)
                })
            })
            .collect();
        exploration_picks.sort_by(|a, b| b.scored.score.total_cmp(&a.scored.score));
        exploration_picks.truncate(counts.exploration);

        // Hero: top of the unfiltered ranking, falling back to the first
        // market when nothing was scorable.
        let hero_outcome = outcomes.first();
        let hero: Option<Market> = hero_outcome
            .map(|outcome| outcome.scored.market.clone())
            .or_else(|| request.markets.first().cloned());
        let hero_category = hero.as_ref().map(|market| market.category.clone());
        let hero_breakdown = hero_outcome.and_then(|outcome| {
            request.tags.tags(&outcome.scored.market.id).map(|tags| {
                ScoreBreakdown::from_modulation(
                    &outcome.scored.market,
                    tags,
                    request.profile,
                    &outcome.modulation,
                )
            })
        });

        // One tagged sequence in serve order; diversity runs over the whole
        // of it with the hero seeding the streak state.
        let section_picks: Vec<(&ScoreOutcome, SectionKind)> = personalized_picks
            .iter()
            .copied()
            .map(|outcome| (outcome, SectionKind::Personalized))
            .chain(
                trending_picks
                    .iter()
                    .copied()
                    .map(|outcome| (outcome, SectionKind::Trending)),
            )
            .chain(
                exploration_picks
                    .iter()
                    .map(|outcome| (outcome, SectionKind::Exploration)),
            )
            .collect();

        let mut breakdowns: HashMap<String, ScoreBreakdown> = HashMap::new();
        for (outcome, _section) in &section_picks {
            if let Some(tags) = request.tags.tags(&outcome.scored.market.id) {
                breakdowns.insert(
                    outcome.scored.market.id.clone(),
                    ScoreBreakdown::from_modulation(
                        &outcome.scored.market,
                        tags,
                        request.profile,
                        &outcome.modulation,
                    ),
                );
            }
        }

        let mut ranked: Vec<RankedItem> = Vec::with_capacity(section_picks.len() + 1);
        if let Some(market) = &hero {
            ranked.push(RankedItem {
                market_id: market.id.clone(),
                category: market.category.clone(),
                score: hero_outcome.map_or(0.0, |outcome| outcome.scored.score),
                section: None,
            });
        }
        for (outcome, section) in &section_picks {
            ranked.push(RankedItem {
                market_id: outcome.scored.market.id.clone(),
                category: outcome.scored.market.category.clone(),
                score: outcome.scored.score,
                section: Some(*section),
            });
        }

        let pre_entries: Vec<FeedEntry> = section_picks
            .iter()
            .map(|(outcome, section)| FeedEntry {
                section: *section,
                market: outcome.scored.market.clone(),
                reason: outcome.scored.reason.clone(),
            })
            .collect();

        let DiversityOutcome { kept, dropped } = enforce_diversity(
            pre_entries,
            hero_category.as_deref(),
            self.rules.max_same_category_in_row,
        );

        let served: Vec<String> = hero
            .iter()
            .map(|market| market.id.clone())
            .chain(kept.iter().map(|entry| entry.market.id.clone()))
            .collect();
        let trace = DiversityTrace {
            ranked,
            dropped: dropped
                .into_iter()
                .map(|fallen| DroppedItem {
                    market_id: fallen.entry.market.id.clone(),
                    category: fallen.entry.market.category.clone(),
                    reason: fallen.reason,
                })
                .collect(),
            served,
        };

        let items: Vec<ExplainedEntry> = kept
            .iter()
            .filter_map(|entry| {
                breakdowns.get(&entry.market.id).map(|breakdown| ExplainedEntry {
                    section: entry.section,
                    market_id: entry.market.id.clone(),
                    breakdown: breakdown.clone(),
                })
            })
            .collect();

        let score = diversity_score(
            hero_category
                .as_deref()
                .into_iter()
                .chain(kept.iter().map(|entry| entry.market.category.as_str())),
        );

        let explanation = FeedExplanation {
            hero: hero_breakdown,
            items,
            ratios: RatioReport {
                target: SectionRatios {
                    personalized: self.rules.personalized_ratio,
                    trending: self.rules.trending_ratio,
                    exploration: self.rules.exploration_ratio,
                },
                actual: section_ratios_of(&kept),
            },
            trace,
        };

        let feed = PersonalizedFeed {
            hero,
            entries: kept,
            metadata: FeedMetadata {
                composed_at: request.now,
                key: request.key.to_owned(),
                profile_summary: request.profile.summary(),
                diversity_score: score,
            },
        };

        ComposedFeed {
            feed,
            explanation: Some(explanation),
        }
    }
}

/// Share each section holds of the served entries.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ratio reporting divides section counts by the served total"
)]
fn section_ratios_of(entries: &[FeedEntry]) -> SectionRatios {
    let total = entries.len();
    if total == 0 {
        return SectionRatios {
            personalized: 0.0,
            trending: 0.0,
            exploration: 0.0,
        };
    }
    let count = |kind: SectionKind| {
        entries.iter().filter(|entry| entry.section == kind).count() as f32
    };
    let denominator = total as f32;
    SectionRatios {
        personalized: count(SectionKind::Personalized) / denominator,
        trending: count(SectionKind::Trending) / denominator,
        exploration: count(SectionKind::Exploration) / denominator,
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "guest section sizing floors a ratio of the requested total"
)]
fn guest_count(total: usize, ratio: f32) -> usize {
    let scaled = (total as f32) * ratio;
    if scaled <= 0.0 {
        return 0;
    }
    scaled.floor() as usize
}

/// Build the guest feed: trending first, then a discovery bucket and the
/// most recent closers, with no scoring and no diversity pass.
fn build_guest(request: &GuestRequest<'_>) -> PersonalizedFeed {
    let trending_count = guest_count(request.total, GUEST_TRENDING_RATIO);
    let recent_count = guest_count(request.total, GUEST_RECENT_RATIO);
    let bucket_count = request
        .total
        .saturating_sub(trending_count)
        .saturating_sub(recent_count);

    // Order by trending rank, unranked markets last, original order as the
    // tie-breaker.
    let mut by_rank: Vec<(usize, &Market)> = request.markets.iter().enumerate().collect();
    by_rank.sort_by_key(|(index, market)| {
        (
            request.ranks.rank(&market.id).unwrap_or(u32::MAX),
            *index,
        )
    });
    let trending_markets: Vec<&Market> = by_rank
        .iter()
        .map(|(_index, market)| *market)
        .take(trending_count)
        .collect();
    let mut used: HashSet<&str> = trending_markets
        .iter()
        .map(|market| market.id.as_str())
        .collect();

    // Most recent closing dates next.
    let mut by_recency: Vec<&Market> = request
        .markets
        .iter()
        .filter(|market| !used.contains(market.id.as_str()))
        .collect();
    by_recency.sort_by_key(|market| std::cmp::Reverse(market.closes_at));
    let recent_markets: Vec<&Market> = by_recency.into_iter().take(recent_count).collect();
    used.extend(recent_markets.iter().map(|market| market.id.as_str()));

    // Whatever remains fills the discovery bucket in collection order.
    let bucket_markets: Vec<&Market> = request
        .markets
        .iter()
        .filter(|market| !used.contains(market.id.as_str()))
        .take(bucket_count)
        .collect();

    let hero: Option<Market> = trending_markets
        .first()
        .copied()
        .cloned()
        .or_else(|| request.markets.first().cloned());

    let mut entries: Vec<FeedEntry> =
        Vec::with_capacity(trending_markets.len() + bucket_markets.len() + recent_markets.len());
    entries.extend(trending_markets.iter().map(|market| FeedEntry {
        section: SectionKind::Trending,
        market: (*market).clone(),
        reason: request
            .ranks
            .rank(&market.id)
            .map_or_else(|| "unranked".to_owned(), |rank| format!("trending rank {rank}")),
    }));
    entries.extend(bucket_markets.iter().map(|market| FeedEntry {
        section: SectionKind::Exploration,
        market: (*market).clone(),
        reason: "discovery".to_owned(),
    }));
    entries.extend(recent_markets.iter().map(|market| FeedEntry {
        section: SectionKind::Exploration,
        market: (*market).clone(),
        reason: "recent closing date".to_owned(),
    }));

    let score = diversity_score(
        hero.as_ref()
            .map(|market| market.category.as_str())
            .into_iter()
            .chain(entries.iter().map(|entry| entry.market.category.as_str())),
    );

    PersonalizedFeed {
        hero,
        entries,
        metadata: FeedMetadata {
            composed_at: request.now,
            key: GUEST_KEY.to_owned(),
            profile_summary: ProfileSummary::guest(),
            diversity_score: score,
        },
    }
}
