//! Criterion benches for the compose hot path.

#![expect(
    clippy::expect_used,
    reason = "benches should fail fast when setup breaks"
)]

use chrono::Duration;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use currents_core::{
    CompositionRules, InMemoryTagCatalog, Market, MarketTags, TrendingRanks,
    test_support::{crypto_profile, reference_now},
};
use currents_feed::{ComposeRequest, FeedComposer, GuestRequest};
use currents_scorer::RelevanceScorer;

const CATEGORIES: [&str; 6] = [
    "Crypto",
    "Politics",
    "Technology",
    "Sports",
    "Economics",
    "Science",
];

fn synthetic_collection(count: usize, seed: u64) -> (Vec<Market>, InMemoryTagCatalog) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut markets = Vec::with_capacity(count);
    let mut catalog = InMemoryTagCatalog::default();
    for index in 0..count {
        let category = CATEGORIES
            .get(index % CATEGORIES.len())
            .copied()
            .unwrap_or("Crypto");
        let id = format!("m{index}");
        let engagement: u32 = rng.gen_range(0..10_000);
        let days: i64 = rng.gen_range(-30..365);
        markets.push(Market::new(
            &id,
            format!("Question {index}?"),
            category,
            engagement,
            reference_now() + Duration::days(days),
        ));
        catalog.insert(
            id,
            MarketTags::new(category, ["Bitcoin", "Trump"], "Price Prediction", "Election"),
        );
    }
    (markets, catalog)
}

fn bench_personalized(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose_personalized");
    for size in [15_usize, 100, 500] {
        let (markets, catalog) = synthetic_collection(size, 99);
        let ranks = TrendingRanks::from_engagement(&markets);
        let profile = crypto_profile();
        let composer = FeedComposer::uncached(RelevanceScorer, CompositionRules::default())
            .expect("default rules are valid");
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                composer.compose(&ComposeRequest {
                    key: profile.user_id.as_str(),
                    profile: &profile,
                    markets: &markets,
                    tags: &catalog,
                    ranks: &ranks,
                    total: 15,
                    seed: 7,
                    now: reference_now(),
                })
            });
        });
    }
    group.finish();
}

fn bench_guest(c: &mut Criterion) {
    let (markets, _catalog) = synthetic_collection(500, 99);
    let ranks = TrendingRanks::from_engagement(&markets);
    let composer = FeedComposer::uncached(RelevanceScorer, CompositionRules::default())
        .expect("default rules are valid");
    c.bench_function("compose_guest_500", |b| {
        b.iter(|| {
            composer.compose_guest(&GuestRequest {
                markets: &markets,
                ranks: &ranks,
                total: 15,
                now: reference_now(),
            })
        });
    });
}

criterion_group!(benches, bench_personalized, bench_guest);
criterion_main!(benches);
