//! Search fan-out and response aggregation
//!
//! A search is issued as one primary request plus one singlette request per
//! facet. [`FanOut`] runs them concurrently and [`merge`] folds the singlette
//! facet counts into the primary response.

mod fanout;
mod merge;

pub use fanout::FanOut;
pub use merge::{merge, MergedResult};
