//! Test-only fixtures: sample markets, a tag catalog, and interest profiles
//! shared by unit and behaviour tests across the workspace.

use chrono::{DateTime, Duration, Utc};

use crate::{InMemoryTagCatalog, InterestProfile, Market, MarketTags, UserProfile};

/// Fixed reference instant used as "now" by deterministic tests.
#[must_use]
pub fn reference_now() -> DateTime<Utc> {
    "2024-02-15T12:00:00Z".parse().expect("reference timestamp")
}

/// Build a market closing `days_to_close` days after [`reference_now`].
///
/// Negative values produce already-closed markets.
#[must_use]
pub fn market(id: &str, category: &str, engagement: u32, days_to_close: i64) -> Market {
    Market::new(
        id,
        format!("Question {id}?"),
        category,
        engagement,
        reference_now() + Duration::days(days_to_close),
    )
}

/// A small cross-category market collection with varied engagement.
#[must_use]
pub fn sample_markets() -> Vec<Market> {
    vec![
        market("m1", "Politics", 950, 120),
        market("m2", "Crypto", 900, 45),
        market("m3", "Technology", 720, 60),
        market("m4", "Economics", 400, 30),
        market("m5", "Entertainment", 650, 14),
        market("m6", "Geopolitics", 380, 90),
        market("m7", "Science", 300, 365),
        market("m8", "Technology", 560, 21),
        market("m9", "Sports", 610, 75),
        market("m10", "Crypto", 250, 7),
        market("m11", "Politics", 180, 40),
        market("m12", "Crypto", 120, 2),
    ]
}

/// Tags covering every market in [`sample_markets`].
#[must_use]
pub fn sample_catalog() -> InMemoryTagCatalog {
    InMemoryTagCatalog::from_entries([
        (
            "m1".to_owned(),
            MarketTags::new(
                "Politics",
                ["Trump", "Biden"],
                "Election Coverage",
                "Election",
            ),
        ),
        (
            "m2".to_owned(),
            MarketTags::new(
                "Crypto",
                ["Bitcoin", "BTC"],
                "Price Prediction",
                "Price Movement",
            ),
        ),
        (
            "m3".to_owned(),
            MarketTags::new(
                "Technology",
                ["OpenAI", "Sam Altman"],
                "Product Launch",
                "Product Launch",
            ),
        ),
        (
            "m4".to_owned(),
            MarketTags::new(
                "Economics",
                ["Federal Reserve"],
                "Policy Analysis",
                "Legislation",
            ),
        ),
        (
            "m5".to_owned(),
            MarketTags::new(
                "Entertainment",
                ["Taylor Swift"],
                "Celebrity Gossip",
                "Personal Life",
            ),
        ),
        (
            "m6".to_owned(),
            MarketTags::new(
                "Geopolitics",
                ["Russia", "Ukraine"],
                "Conflict Resolution",
                "Ceasefire",
            ),
        ),
        (
            "m7".to_owned(),
            MarketTags::new(
                "Science",
                ["SpaceX", "NASA"],
                "Innovation",
                "Space Mission",
            ),
        ),
        (
            "m8".to_owned(),
            MarketTags::new(
                "Technology",
                ["Apple"],
                "Product Launch",
                "Product Launch",
            ),
        ),
        (
            "m9".to_owned(),
            MarketTags::new(
                "Sports",
                ["Manchester City"],
                "Championship Odds",
                "Championship",
            ),
        ),
        (
            "m10".to_owned(),
            MarketTags::new(
                "Crypto",
                ["Ethereum"],
                "Technical Analysis",
                "Protocol Upgrade",
            ),
        ),
        (
            "m11".to_owned(),
            MarketTags::new("Politics", ["Congress"], "Polling", "Legislation"),
        ),
        (
            "m12".to_owned(),
            MarketTags::new(
                "Crypto",
                ["DeFi"],
                "Price Prediction",
                "Hack/Security",
            ),
        ),
    ])
}

/// A crypto-leaning user profile mirroring a production persona.
#[must_use]
pub fn crypto_profile() -> UserProfile {
    let interests = InterestProfile::new()
        .with_category("Crypto", 0.92)
        .with_category("Technology", 0.65)
        .with_category("Finance", 0.70)
        .with_category("Politics", 0.25)
        .with_actor("Bitcoin", 0.95)
        .with_actor("Ethereum", 0.90)
        .with_actor("DeFi", 0.88)
        .with_actor("Coinbase", 0.75)
        .with_actor("SEC", 0.60)
        .with_angle("Price Prediction", 0.90)
        .with_angle("Regulation", 0.70)
        .with_angle("Technical Analysis", 0.85)
        .with_event_type("Price Movement", 0.92)
        .with_event_type("Regulation", 0.75)
        .with_event_type("Hack/Security", 0.80);
    UserProfile::new("user-crypto-1", reference_now()).with_interests(interests)
}

/// A politics-leaning user profile mirroring a production persona.
#[must_use]
pub fn politics_profile() -> UserProfile {
    let interests = InterestProfile::new()
        .with_category("Politics", 0.95)
        .with_category("Geopolitics", 0.80)
        .with_category("Economics", 0.55)
        .with_actor("Trump", 0.92)
        .with_actor("Biden", 0.88)
        .with_actor("Congress", 0.70)
        .with_angle("Election Coverage", 0.95)
        .with_angle("Controversy", 0.85)
        .with_angle("Polling", 0.80)
        .with_event_type("Election", 0.95)
        .with_event_type("Legislation", 0.75);
    UserProfile::new("user-politics-1", reference_now()).with_interests(interests)
}
