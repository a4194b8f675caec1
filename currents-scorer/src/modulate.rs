//! Exploitation/exploration modulation: blend the base score with an
//! injected randomness source, then apply recency and trending boosts.
//!
//! Boosts compose multiplicatively in a fixed order (blend, recency,
//! trending). The consumed random draw and each applied boost are captured
//! in the returned [`Modulation`] so the debug explainer can replay the pass
//! instead of redrawing.

use chrono::{DateTime, Utc};
use rand::Rng;

use currents_core::{
    CompositionRules, Market, MarketTags, ScoredMarket, Scorer, SectionKind,
    TRENDING_SECTION_CUTOFF, UserProfile,
};

/// Weight of the base score in the exploration blend; relevance is
/// deliberately suppressed so novel items can surface.
pub const EXPLORATION_BASE_WEIGHT: f32 = 0.30;

/// Multiplicative bonus applied to the top trending markets.
const TRENDING_BOOST: f32 = 0.15;
/// Global ranks at or above this cutoff receive the trending boost.
const TRENDING_BOOST_CUTOFF: u32 = 3;
/// Markets younger than this receive the full recency boost.
const FULL_RECENCY_WINDOW_DAYS: f32 = 3.0;
/// The recency bonus decays linearly to nothing at this age.
const RECENCY_DECAY_END_DAYS: f32 = 30.0;

/// Seconds per day, used by the age proxy.
const SECONDS_PER_DAY: f32 = 86_400.0;

/// Which blend a scoring pass uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Track {
    /// Favour the learned base score (90/10 by default).
    Exploit,
    /// Favour randomness so lower-relevance items can surface (30/70).
    Explore,
}

impl Track {
    /// Return the track as a lowercase `&str`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exploit => "exploit",
            Self::Explore => "explore",
        }
    }
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single modifier did to a score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ModifierKind {
    /// The exploitation/exploration blend, with the captured random draw.
    Blend {
        /// Track the blend ran on.
        track: Track,
        /// Random draw consumed from the injected source.
        draw: f32,
    },
    /// The recency boost for young markets.
    Recency {
        /// Age proxy in days at modulation time; negative while the market
        /// is still open.
        age_days: f32,
        /// Multiplier that was applied.
        multiplier: f32,
    },
    /// The boost for globally top-trending markets.
    Trending {
        /// Global trending rank.
        rank: u32,
        /// Multiplier that was applied.
        multiplier: f32,
    },
}

/// A recorded score adjustment: what happened and by how much.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    /// Which adjustment ran.
    pub kind: ModifierKind,
    /// Signed change to the score.
    pub delta: f32,
}

impl Modifier {
    /// Human-readable description of the adjustment.
    #[must_use]
    pub fn reason(&self) -> String {
        match &self.kind {
            ModifierKind::Blend { track, draw } => {
                format!("{track} blend with random draw {draw:.3}")
            }
            ModifierKind::Recency {
                age_days,
                multiplier,
            } => format!("recency x{multiplier:.3} at {age_days:.1} days"),
            ModifierKind::Trending { rank, multiplier } => {
                format!("trending rank {rank} x{multiplier:.2}")
            }
        }
    }
}

/// The full record of one modulation pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modulation {
    /// Track the pass ran on.
    pub track: Track,
    /// Base relevance score before any adjustment.
    pub base: f32,
    /// Final score after all adjustments.
    pub score: f32,
    /// Adjustments in application order.
    pub modifiers: Vec<Modifier>,
}

/// Days elapsed since the market's closing date; negative while it is still
/// in the future. This is the engine's age proxy.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "the age proxy converts a second count into fractional days"
)]
#[must_use]
pub fn age_in_days(now: DateTime<Utc>, closes_at: DateTime<Utc>) -> f32 {
    (now - closes_at).num_seconds() as f32 / SECONDS_PER_DAY
}

/// Blend a base score with randomness and apply recency and trending boosts.
///
/// The blend always runs; the recency and trending modifiers are recorded
/// only when they changed the score. Randomness comes from the caller's
/// generator so passes can be replayed deterministically.
#[expect(
    clippy::float_arithmetic,
    reason = "modulation is weighted blending and multiplicative boosts"
)]
pub fn modulate<R: Rng>(
    base: f32,
    track: Track,
    trending_rank: Option<u32>,
    age_days: f32,
    rules: &CompositionRules,
    rng: &mut R,
) -> Modulation {
    let draw = rng.gen_range(0.0_f32..1.0_f32);
    let blended = match track {
        Track::Exploit => {
            base * rules.exploitation_weight + draw * (1.0 - rules.exploitation_weight)
        }
        Track::Explore => {
            base * EXPLORATION_BASE_WEIGHT + draw * (1.0 - EXPLORATION_BASE_WEIGHT)
        }
    };
    let mut modifiers = vec![Modifier {
        kind: ModifierKind::Blend { track, draw },
        delta: blended - base,
    }];
    let mut score = blended;

    let recency = recency_multiplier(age_days, rules.recency_boost);
    if recency > 1.0 {
        let boosted = score * recency;
        modifiers.push(Modifier {
            kind: ModifierKind::Recency {
                age_days,
                multiplier: recency,
            },
            delta: boosted - score,
        });
        score = boosted;
    }

    if let Some(rank) = trending_rank {
        if rank <= TRENDING_BOOST_CUTOFF {
            let multiplier = 1.0 + TRENDING_BOOST;
            let boosted = score * multiplier;
            modifiers.push(Modifier {
                kind: ModifierKind::Trending { rank, multiplier },
                delta: boosted - score,
            });
            score = boosted;
        }
    }

    Modulation {
        track,
        base,
        score,
        modifiers,
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "the recency bonus decays linearly between the window bounds"
)]
fn recency_multiplier(age_days: f32, boost: f32) -> f32 {
    if age_days < FULL_RECENCY_WINDOW_DAYS {
        1.0 + boost
    } else if age_days < RECENCY_DECAY_END_DAYS {
        let window = RECENCY_DECAY_END_DAYS - FULL_RECENCY_WINDOW_DAYS;
        let decay = 1.0 - (age_days - FULL_RECENCY_WINDOW_DAYS) / window;
        1.0 + boost * decay
    } else {
        1.0
    }
}

/// Outcome of a full scoring pass for one market: the scored item and the
/// modulation record that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    /// The scored market with its provisional section.
    pub scored: ScoredMarket,
    /// The recorded modulation, for breakdown replay.
    pub modulation: Modulation,
}

/// One compose call's scoring context: the scorer, profile, rules, and
/// reference instant shared by every market scored in the pass.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPass<'a, S: Scorer> {
    scorer: &'a S,
    profile: &'a UserProfile,
    rules: &'a CompositionRules,
    now: DateTime<Utc>,
}

impl<'a, S: Scorer> ScoringPass<'a, S> {
    /// Bundle the shared scoring inputs for one compose call.
    #[must_use]
    pub fn new(
        scorer: &'a S,
        profile: &'a UserProfile,
        rules: &'a CompositionRules,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            scorer,
            profile,
            rules,
            now,
        }
    }

    /// Score one market end to end: base relevance, modulation, and the
    /// provisional section guess.
    ///
    /// Exploration passes land in the exploration section; otherwise a
    /// global rank at or above the trending cutoff proposes the trending
    /// section and everything else is personalized.
    pub fn score_market<R: Rng>(
        &self,
        market: &Market,
        tags: &MarketTags,
        trending_rank: Option<u32>,
        track: Track,
        rng: &mut R,
    ) -> ScoreOutcome {
        let base = self.scorer.score(market, tags, self.profile);
        let age_days = age_in_days(self.now, market.closes_at);
        let modulation = modulate(base, track, trending_rank, age_days, self.rules, rng);

        let section = match track {
            Track::Explore => SectionKind::Exploration,
            Track::Exploit => {
                if trending_rank.is_some_and(|rank| rank <= TRENDING_SECTION_CUTOFF) {
                    SectionKind::Trending
                } else {
                    SectionKind::Personalized
                }
            }
        };
        let rank_label = trending_rank
            .map_or_else(|| "unranked".to_owned(), |rank| rank.to_string());
        let reason = format!(
            "relevance={:.2}, trending={rank_label}, exploration={}",
            modulation.score,
            track == Track::Explore,
        );

        ScoreOutcome {
            scored: ScoredMarket {
                market: market.clone(),
                score: modulation.score,
                section,
                reason,
            },
            modulation,
        }
    }
}
