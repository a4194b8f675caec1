use chrono::{DateTime, Utc};

/// A prediction-market item as supplied by the external item collection.
///
/// Only the fields the engine reads are modelled: the identifier, the
/// display question, the category used for diversity enforcement, the raw
/// engagement count the trending calculator ranks by, and the closing date
/// used as the recency proxy.
///
/// # Examples
/// ```
/// use chrono::{DateTime, Utc};
/// use currents_core::Market;
///
/// let closes: DateTime<Utc> = "2024-06-30T00:00:00Z".parse().expect("timestamp");
/// let market = Market::new("m2", "Will Bitcoin reach $100k?", "Crypto", 1_250, closes);
/// assert_eq!(market.id, "m2");
/// assert_eq!(market.category, "Crypto");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Market {
    /// Unique identifier.
    pub id: String,
    /// Display question posed by the market.
    pub question: String,
    /// Category label used for diversity enforcement.
    pub category: String,
    /// Raw engagement count (participants, votes) feeding trending ranks.
    pub engagement: u32,
    /// Closing or reference date; the engine's age proxy.
    pub closes_at: DateTime<Utc>,
}

impl Market {
    /// Construct a market record.
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        category: impl Into<String>,
        engagement: u32,
        closes_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            category: category.into(),
            engagement,
            closes_at,
        }
    }
}
