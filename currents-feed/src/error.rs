//! Errors raised when constructing the feed composer.
//!
//! Composition itself is infallible by contract: an empty market collection
//! yields an empty feed, untagged markets are excluded and logged, and cache
//! trouble degrades to recomputation.

use thiserror::Error;

use currents_core::RulesError;

/// Errors returned by [`FeedComposer`](crate::FeedComposer) constructors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComposeError {
    /// The supplied composition rules failed validation.
    #[error("invalid composition rules: {source}")]
    InvalidRules {
        /// The specific validation failure.
        #[from]
        source: RulesError,
    },
}
