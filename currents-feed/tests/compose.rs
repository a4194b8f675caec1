#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Integration coverage for feed composition: section targets, diversity,
//! caching, guest feeds, and explanation fidelity.

use chrono::Duration;
use rstest::{fixture, rstest};

use currents_core::{
    CompositionRules, InMemoryTagCatalog, Market, PersonalizedFeed, TrendingRanks, UserProfile,
    test_support::{
        crypto_profile, market, politics_profile, reference_now, sample_catalog, sample_markets,
    },
};
use currents_feed::{ComposeError, ComposeRequest, FeedCache, FeedComposer, GuestRequest};
use currents_scorer::RelevanceScorer;

const TOTAL: usize = 15;
const SEED: u64 = 1234;

struct Fixture {
    markets: Vec<Market>,
    catalog: InMemoryTagCatalog,
    ranks: TrendingRanks,
    profile: UserProfile,
}

#[fixture]
fn fixture() -> Fixture {
    let markets = sample_markets();
    let ranks = TrendingRanks::from_engagement(&markets);
    Fixture {
        markets,
        catalog: sample_catalog(),
        ranks,
        profile: crypto_profile(),
    }
}

fn request<'a>(fixture: &'a Fixture, seed: u64) -> ComposeRequest<'a> {
    ComposeRequest {
        key: fixture.profile.user_id.as_str(),
        profile: &fixture.profile,
        markets: &fixture.markets,
        tags: &fixture.catalog,
        ranks: &fixture.ranks,
        total: TOTAL,
        seed,
        now: reference_now(),
    }
}

fn longest_category_run(feed: &PersonalizedFeed) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut last: Option<&str> = None;
    for category in feed.markets().map(|m| m.category.as_str()) {
        if last == Some(category) {
            current += 1;
        } else {
            last = Some(category);
            current = 1;
        }
        longest = longest.max(current);
    }
    longest
}

#[rstest]
fn sections_stay_within_their_targets(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let feed = composer.compose(&request(&fixture, SEED));
    let counts = composer.rules().section_counts(TOTAL);
    assert!(feed.personalized().count() <= counts.personalized);
    assert!(feed.trending().count() <= counts.trending);
    assert!(feed.exploration().count() <= counts.exploration);
    assert!(feed.len() <= TOTAL);
}

#[rstest]
fn no_category_runs_past_the_limit(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    for seed in 0..20 {
        composer.invalidate_all();
        let feed = composer.compose(&request(&fixture, seed));
        assert!(
            longest_category_run(&feed) <= composer.rules().max_same_category_in_row,
            "seed {seed} broke the diversity constraint"
        );
    }
}

#[rstest]
fn hero_is_present_when_markets_exist(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let feed = composer.compose(&request(&fixture, SEED));
    assert!(feed.hero.is_some());
}

#[rstest]
fn untagged_markets_never_appear(fixture: Fixture) {
    let mut markets = fixture.markets.clone();
    markets.push(market("untagged", "Mystery", 9_999, 1));
    let subject = Fixture {
        ranks: TrendingRanks::from_engagement(&markets),
        markets,
        catalog: fixture.catalog.clone(),
        profile: fixture.profile.clone(),
    };
    let composer = FeedComposer::with_defaults();
    let feed = composer.compose(&request(&subject, SEED));
    assert!(feed.markets().all(|m| m.id != "untagged"));
}

#[rstest]
fn empty_collection_composes_an_empty_feed(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let empty = Fixture {
        markets: Vec::new(),
        catalog: fixture.catalog.clone(),
        ranks: TrendingRanks::from_engagement(&[]),
        profile: fixture.profile.clone(),
    };
    let feed = composer.compose(&request(&empty, SEED));
    assert!(feed.is_empty());
    assert!(feed.hero.is_none());
    assert_eq!(feed.metadata.diversity_score, 0.0);
}

#[rstest]
fn low_affinity_profiles_fill_no_personalized_slots(fixture: Fixture) {
    let cold_profile = UserProfile::new("user-cold-1", reference_now());
    let composer = FeedComposer::with_defaults();
    let cold = Fixture {
        markets: fixture.markets.clone(),
        catalog: fixture.catalog.clone(),
        ranks: fixture.ranks.clone(),
        profile: cold_profile,
    };
    let feed = composer.compose(&request(&cold, SEED));
    assert_eq!(feed.personalized().count(), 0);
    assert!(feed.trending().count() > 0);
}

#[rstest]
fn composes_within_the_ttl_are_identical(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let first = composer.compose(&request(&fixture, SEED));
    // Different seed, but the fresh snapshot must be served unchanged.
    let mut later = request(&fixture, SEED + 1);
    later.now = reference_now() + Duration::seconds(299);
    let second = composer.compose(&later);
    assert_eq!(first, second);
}

#[rstest]
fn expiry_permits_recomposition(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let first = composer.compose(&request(&fixture, SEED));
    let mut later = request(&fixture, SEED);
    later.now = reference_now() + Duration::seconds(301);
    let second = composer.compose(&later);
    assert_eq!(first.metadata.composed_at, reference_now());
    assert_eq!(second.metadata.composed_at, later.now);
}

#[rstest]
fn invalidate_forces_a_rebuild(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let first = composer.compose(&request(&fixture, SEED));
    composer.invalidate(&fixture.profile.user_id);
    let mut later = request(&fixture, SEED);
    later.now = reference_now() + Duration::seconds(10);
    let second = composer.compose(&later);
    assert_eq!(first.metadata.composed_at, reference_now());
    assert_eq!(second.metadata.composed_at, later.now);
}

#[rstest]
fn invalid_rules_are_rejected() {
    let rules = CompositionRules {
        personalized_ratio: 0.9,
        ..CompositionRules::default()
    };
    let err = FeedComposer::new(RelevanceScorer, rules).expect_err("ratios must sum to one");
    assert!(matches!(err, ComposeError::InvalidRules { .. }));
}

#[rstest]
fn an_injected_cache_controls_the_ttl(fixture: Fixture) {
    let cache = FeedCache::new(Duration::seconds(30));
    let composer = FeedComposer::with_cache(RelevanceScorer, CompositionRules::default(), cache)
        .expect("default rules are valid");
    let first = composer.compose(&request(&fixture, SEED));
    let mut later = request(&fixture, SEED);
    later.now = reference_now() + Duration::seconds(31);
    let second = composer.compose(&later);
    assert_eq!(first.metadata.composed_at, reference_now());
    assert_eq!(second.metadata.composed_at, later.now);
}

#[rstest]
fn summaries_reflect_the_composing_profile(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let crypto_feed = composer.compose(&request(&fixture, SEED));
    let politics_fixture = Fixture {
        markets: fixture.markets.clone(),
        catalog: fixture.catalog.clone(),
        ranks: fixture.ranks.clone(),
        profile: politics_profile(),
    };
    let politics_feed = composer.compose(&request(&politics_fixture, SEED));
    assert_ne!(
        crypto_feed.metadata.profile_summary,
        politics_feed.metadata.profile_summary
    );
}

#[rstest]
fn uncached_composers_always_recompute(fixture: Fixture) {
    let composer = FeedComposer::uncached(RelevanceScorer, CompositionRules::default())
        .expect("default rules are valid");
    let first = composer.compose(&request(&fixture, SEED));
    let mut later = request(&fixture, SEED);
    later.now = reference_now() + Duration::seconds(1);
    let second = composer.compose(&later);
    assert_eq!(second.metadata.composed_at, later.now);
    assert_eq!(first.entries.len(), second.entries.len());
}

#[rstest]
fn explanation_describes_the_served_feed(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let composed = composer.compose_explained(&request(&fixture, SEED));
    let explanation = composed.explanation.expect("personalized feeds are explained");

    let served_ids: Vec<String> = composed
        .feed
        .markets()
        .map(|market| market.id.clone())
        .collect();
    assert_eq!(explanation.trace.served, served_ids);
    assert_eq!(explanation.items.len(), composed.feed.entries.len());
    for (entry, explained) in composed.feed.entries.iter().zip(&explanation.items) {
        assert_eq!(entry.market.id, explained.market_id);
        assert_eq!(entry.section, explained.section);
    }
    assert!(explanation.hero.is_some());
}

#[rstest]
#[expect(
    clippy::float_arithmetic,
    reason = "tests compare floating point values"
)]
fn explanation_ratios_cover_the_served_entries(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let composed = composer.compose_explained(&request(&fixture, SEED));
    let explanation = composed.explanation.expect("personalized feeds are explained");
    let actual = explanation.ratios.actual;
    let sum = actual.personalized + actual.trending + actual.exploration;
    assert!(
        (sum - 1.0).abs() < 0.000_1,
        "served ratios should sum to one, got {sum}"
    );
    assert_eq!(explanation.ratios.target.personalized, 0.60);
}

#[rstest]
fn cache_hits_serve_the_matching_explanation(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let first = composer.compose_explained(&request(&fixture, SEED));
    let mut later = request(&fixture, SEED + 99);
    later.now = reference_now() + Duration::seconds(60);
    let second = composer.compose_explained(&later);
    assert_eq!(first, second);
}

#[rstest]
fn guest_feed_needs_no_profile(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let feed = composer.compose_guest(&GuestRequest {
        markets: &fixture.markets,
        ranks: &fixture.ranks,
        total: TOTAL,
        now: reference_now(),
    });
    assert_eq!(feed.personalized().count(), 0);
    assert_eq!(feed.trending().count(), 7);
    assert_eq!(feed.metadata.key, "guest");
    // 12 fixture markets: 7 trending, 3 recent closers, 2 left for the
    // discovery bucket.
    assert_eq!(feed.len(), fixture.markets.len());

    let top_ranked = fixture
        .markets
        .iter()
        .find(|market| fixture.ranks.rank(&market.id) == Some(1))
        .expect("a top-ranked market exists");
    let hero = feed.hero.as_ref().expect("guest hero");
    assert_eq!(hero.id, top_ranked.id);
}

#[rstest]
fn guest_feed_survives_an_empty_collection() {
    let ranks = TrendingRanks::from_engagement(&[]);
    let composer = FeedComposer::with_defaults();
    let feed = composer.compose_guest(&GuestRequest {
        markets: &[],
        ranks: &ranks,
        total: TOTAL,
        now: reference_now(),
    });
    assert!(feed.is_empty());
}

#[rstest]
fn guest_feeds_are_cached_under_the_guest_key(fixture: Fixture) {
    let composer = FeedComposer::with_defaults();
    let first = composer.compose_guest(&GuestRequest {
        markets: &fixture.markets,
        ranks: &fixture.ranks,
        total: TOTAL,
        now: reference_now(),
    });
    let second = composer.compose_guest(&GuestRequest {
        markets: &fixture.markets,
        ranks: &fixture.ranks,
        total: TOTAL,
        now: reference_now() + Duration::seconds(120),
    });
    assert_eq!(first, second);
}
