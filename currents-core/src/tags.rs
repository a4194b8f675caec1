/// Multi-dimensional content tags for a single market.
///
/// Tags are produced by an external catalog. Markets without an entry in the
/// catalog are excluded from scoring entirely; that exclusion is the
/// caller's signal that tagging has not caught up, not an error.
///
/// # Examples
/// ```
/// use currents_core::MarketTags;
///
/// let tags = MarketTags::new(
///     "Crypto",
///     ["Bitcoin", "BTC"],
///     "Price Prediction",
///     "Price Movement",
/// );
/// assert_eq!(tags.actors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketTags {
    /// Category label, e.g. "Crypto".
    pub category: String,
    /// Key entities in order of prominence; may be empty.
    pub actors: Vec<String>,
    /// Editorial angle, e.g. "Controversy" or "Price Prediction".
    pub angle: String,
    /// Kind of underlying event, e.g. "Election" or "Product Launch".
    pub event_type: String,
}

impl MarketTags {
    /// Construct a tag tuple.
    pub fn new<A>(
        category: impl Into<String>,
        actors: A,
        angle: impl Into<String>,
        event_type: impl Into<String>,
    ) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            category: category.into(),
            actors: actors.into_iter().map(Into::into).collect(),
            angle: angle.into(),
            event_type: event_type.into(),
        }
    }
}
