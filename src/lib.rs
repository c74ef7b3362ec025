//! Client-side orchestration for faceted full-text search.
//!
//! A [`SearchStore`] holds the search state of one session: configuration,
//! input and parameters, declared facets, results and suggestions. Running a
//! search issues one primary request plus one request per facet with that
//! facet's own filter removed, so every facet reports counts as if only the
//! *other* facets were filtering. The responses are merged and published to
//! subscribers as a new immutable snapshot.
//!
//! - [`models`]: state, facets, parameters and response bodies
//! - [`query`]: request planning and wire bodies
//! - [`transport`]: pluggable request execution (HTTP by default)
//! - [`search`]: labeled fan-out and response merging
//! - [`store`]: the observable state container and its operations

pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod search;
pub mod store;
pub mod transport;

pub use error::{AppError, Result};
pub use store::{SearchStore, Subscription, Transition};
