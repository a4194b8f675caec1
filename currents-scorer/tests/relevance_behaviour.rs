#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

//! Behavioural coverage for base relevance scoring and track modulation.

use std::cell::RefCell;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

use currents_core::{
    CompositionRules, MarketTags, Scorer, UserProfile,
    test_support::{crypto_profile, market},
};
use currents_scorer::{EXPLORATION_BASE_WEIGHT, RelevanceScorer, Track, modulate};

const SEED: u64 = 77;
const TOLERANCE: f32 = 0.000_1;

/// Aggregate fixtures shared across the BDD scenarios.
pub struct TestContext {
    profile: RefCell<Option<UserProfile>>,
    tags: RefCell<Option<MarketTags>>,
    base_score: RefCell<Option<f32>>,
    modulated_score: RefCell<Option<f32>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    TestContext {
        profile: RefCell::new(None),
        tags: RefCell::new(None),
        base_score: RefCell::new(None),
        modulated_score: RefCell::new(None),
    }
}

#[given("a crypto-focused interest profile")]
fn crypto_interest_profile(context: &TestContext) {
    *context.profile.borrow_mut() = Some(crypto_profile());
}

#[given("a Bitcoin market tagged across all four dimensions")]
fn bitcoin_tags(context: &TestContext) {
    *context.tags.borrow_mut() = Some(MarketTags::new(
        "Crypto",
        ["Bitcoin"],
        "Price Prediction",
        "Price Movement",
    ));
}

#[given("a market tagged with unfamiliar values")]
fn unfamiliar_tags(context: &TestContext) {
    *context.tags.borrow_mut() = Some(MarketTags::new(
        "Gardening",
        ["Begonias"],
        "Horticulture",
        "Bloom",
    ));
}

#[when("I score the market for the profile")]
fn score_market(context: &TestContext) {
    let profile = context
        .profile
        .borrow()
        .clone()
        .expect("profile must be initialised");
    let tags = context
        .tags
        .borrow()
        .clone()
        .expect("tags must be initialised");
    let subject = market("m2", "Crypto", 900, 45);
    *context.base_score.borrow_mut() = Some(RelevanceScorer.score(&subject, &tags, &profile));
}

#[when("I modulate the base score on the exploration track")]
fn modulate_exploration(context: &TestContext) {
    score_market(context);
    let base = context
        .base_score
        .borrow()
        .expect("base score must be recorded");
    let rules = CompositionRules::default();
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let modulation = modulate(base, Track::Explore, None, 60.0, &rules, &mut rng);
    *context.modulated_score.borrow_mut() = Some(modulation.score);
}

#[then("the base score is 0.925")]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point values"
)]
fn assert_worked_example(context: &TestContext) {
    let score = context
        .base_score
        .borrow()
        .expect("base score must be recorded");
    assert!(
        (score - 0.925).abs() < TOLERANCE,
        "expected the worked example score, got {score}"
    );
}

#[then("the base score is zero")]
fn assert_zero_score(context: &TestContext) {
    let score = context
        .base_score
        .borrow()
        .expect("base score must be recorded");
    assert_eq!(score, 0.0);
}

#[then("the blended score favours the random draw")]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating point values"
)]
fn assert_exploration_blend(context: &TestContext) {
    let base = context
        .base_score
        .borrow()
        .expect("base score must be recorded");
    let score = context
        .modulated_score
        .borrow()
        .expect("modulated score must be recorded");
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let draw = rng.gen_range(0.0_f32..1.0_f32);
    let expected = base * EXPLORATION_BASE_WEIGHT + draw * (1.0 - EXPLORATION_BASE_WEIGHT);
    assert!(
        (score - expected).abs() < TOLERANCE,
        "expected {expected}, got {score}"
    );
}

#[scenario(path = "tests/features/relevance.feature", index = 0)]
fn strong_match_scores_high(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/relevance.feature", index = 1)]
fn unknown_values_score_zero(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/relevance.feature", index = 2)]
fn exploration_suppresses_relevance(context: TestContext) {
    let _ = context;
}
