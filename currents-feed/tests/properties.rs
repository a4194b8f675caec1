#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Property coverage for the composition invariants: score ranges, streak
//! bounds, and section length budgets.

use proptest::prelude::*;

use currents_core::{
    CompositionRules, FeedEntry, InterestProfile, MarketTags, Scorer, SectionKind, TrendingRanks,
    UserProfile,
    test_support::{crypto_profile, market, reference_now, sample_catalog, sample_markets},
};
use currents_feed::{ComposeRequest, FeedComposer, enforce_diversity};
use currents_scorer::RelevanceScorer;

fn entry(id: usize, category_tag: u8) -> FeedEntry {
    FeedEntry {
        section: SectionKind::Personalized,
        market: market(&format!("m{id}"), &format!("category-{category_tag}"), 1, 30),
        reason: String::new(),
    }
}

fn longest_run<'a, I>(categories: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut longest = 0_usize;
    let mut current = 0_usize;
    let mut last: Option<&str> = None;
    for category in categories {
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

proptest! {
    #[test]
    fn base_scores_stay_in_unit_range(
        category_affinity in -2.0_f32..2.0,
        actor_affinities in proptest::collection::vec(-2.0_f32..2.0, 0..4),
        angle_affinity in -2.0_f32..2.0,
        event_affinity in -2.0_f32..2.0,
    ) {
        let tags = MarketTags::new(
            "Category",
            (0..actor_affinities.len()).map(|index| format!("Actor{index}")),
            "Angle",
            "Event",
        );
        let mut interests = InterestProfile::new()
            .with_category("Category", category_affinity)
            .with_angle("Angle", angle_affinity)
            .with_event_type("Event", event_affinity);
        for (index, affinity) in actor_affinities.iter().enumerate() {
            interests = interests.with_actor(format!("Actor{index}"), *affinity);
        }
        let profile = UserProfile::new("prop-user", reference_now()).with_interests(interests);
        let subject = market("prop-market", "Category", 1, 30);

        let score = RelevanceScorer.score(&subject, &tags, &profile);
        prop_assert!((0.0..=1.0).contains(&score), "score escaped the unit range: {score}");
    }

    #[test]
    fn enforcement_never_leaves_a_long_run(
        categories in proptest::collection::vec(0_u8..4, 0..30),
        max_run in 1_usize..4,
        seed_tag in proptest::option::of(0_u8..4),
    ) {
        let entries: Vec<FeedEntry> = categories
            .iter()
            .enumerate()
            .map(|(index, tag)| entry(index, *tag))
            .collect();
        let seed_category = seed_tag.map(|tag| format!("category-{tag}"));
        let total = entries.len();

        let outcome = enforce_diversity(entries, seed_category.as_deref(), max_run);

        prop_assert_eq!(outcome.kept.len() + outcome.dropped.len(), total);
        let categories_kept: Vec<&str> = seed_category
            .as_deref()
            .into_iter()
            .chain(outcome.kept.iter().map(|e| e.market.category.as_str()))
            .collect();
        prop_assert!(longest_run(categories_kept) <= max_run);
    }

    #[test]
    fn section_counts_always_sum_to_the_total(total in 0_usize..100) {
        let counts = CompositionRules::default().section_counts(total);
        prop_assert_eq!(counts.personalized + counts.trending + counts.exploration, total);
    }

    #[test]
    fn composed_feeds_respect_the_length_budget(seed in any::<u64>(), total in 0_usize..31) {
        let markets = sample_markets();
        let catalog = sample_catalog();
        let ranks = TrendingRanks::from_engagement(&markets);
        let profile = crypto_profile();
        let composer = FeedComposer::uncached(RelevanceScorer, CompositionRules::default())
            .expect("default rules are valid");

        let feed = composer.compose(&ComposeRequest {
            key: profile.user_id.as_str(),
            profile: &profile,
            markets: &markets,
            tags: &catalog,
            ranks: &ranks,
            total,
            seed,
            now: reference_now(),
        });

        prop_assert!(feed.len() <= total);
        let categories: Vec<String> = feed
            .markets()
            .map(|m| m.category.clone())
            .collect();
        prop_assert!(
            longest_run(categories.iter().map(String::as_str)) <= 2,
            "diversity constraint violated for seed {seed}"
        );
    }
}
