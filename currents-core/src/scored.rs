use crate::Market;

/// Target section a scored market is destined for.
///
/// # Examples
/// ```
/// use currents_core::SectionKind;
///
/// assert_eq!(SectionKind::Personalized.as_str(), "personalized");
/// assert_eq!(SectionKind::Trending.to_string(), "trending");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SectionKind {
    /// Markets matched to the user's learned interests.
    Personalized,
    /// Markets popular across the whole platform.
    Trending,
    /// Deliberately novel or lower-relevance markets.
    Exploration,
}

impl SectionKind {
    /// Return the section label as a lowercase `&str`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personalized => "personalized",
            Self::Trending => "trending",
            Self::Exploration => "exploration",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personalized" => Ok(Self::Personalized),
            "trending" => Ok(Self::Trending),
            "exploration" => Ok(Self::Exploration),
            _ => Err(format!("unknown section '{s}'")),
        }
    }
}

/// A market together with its final score, target section, and a
/// human-readable reason.
///
/// Instances are ephemeral: one is produced per market per compose call and
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredMarket {
    /// The underlying market record.
    pub market: Market,
    /// Final score after blending and boosts; may exceed `1.0` by the
    /// bounded boost margin.
    pub score: f32,
    /// Section the scoring pass proposes for the market.
    pub section: SectionKind,
    /// Why the market scored as it did, for logs and debugging.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(
            SectionKind::Exploration.to_string(),
            SectionKind::Exploration.as_str()
        );
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = SectionKind::from_str("hero").unwrap_err();
        assert!(err.contains("unknown section"));
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(
            SectionKind::from_str("Trending"),
            Ok(SectionKind::Trending)
        );
    }
}
