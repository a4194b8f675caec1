//! Feed composition for Currents.
//!
//! [`FeedComposer`] turns a flat market collection, a tag catalog, trending
//! ranks, and a user profile into a served feed: a hero item plus
//! ratio-bound personalized, trending, and exploration sections with a
//! category-diversity guarantee. Results are cached per key in an injected
//! TTL store, and every compose pass records enough of its randomness to
//! reproduce a scoring explanation for exactly the feed that was served.
//!
//! Guests get a profile-free variant built from trending ranks and closing
//! dates alone.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod compose;
mod diversity;
mod error;
mod explain;

pub use cache::FeedCache;
pub use compose::{
    ComposeRequest, ComposedFeed, DEFAULT_TOTAL, FeedComposer, GuestRequest,
};
pub use diversity::{DiversityOutcome, DroppedEntry, diversity_score, enforce_diversity};
pub use error::ComposeError;
pub use explain::{
    DiversityTrace, DroppedItem, ExplainedEntry, FeedExplanation, RankedItem, RatioReport,
    SectionRatios,
};
