//! Common test utilities for store integration tests
//!
//! Stub transports answer from the request body, so a test can tell the
//! primary request from a facet's singlette request by its `filter` and
//! `facets` keys.

#![allow(dead_code)]

use faceted_search_store::models::SearchConfig;
use faceted_search_store::transport::{Transport, TransportResponse, TransportResult};
use faceted_search_store::SearchStore;
use serde_json::Value;
use std::sync::Arc;

/// Store with the default test configuration and the given transport
pub fn store_with(transport: Arc<dyn Transport>) -> SearchStore {
    let store = SearchStore::with_transport(transport);
    store.set_config(SearchConfig::new("svc", "docs", "K"));
    store
}

/// 200 response with `body` as JSON
pub fn ok(body: Value) -> TransportResult<TransportResponse> {
    Ok(TransportResponse::ok_json(&body))
}

/// Whether a search body asks for counts of `facet` only
pub fn is_singlette_for(body: &Value, facet: &str) -> bool {
    match body["facets"].as_array() {
        Some(facets) if facets.len() == 1 => facets[0]
            .as_str()
            .map(|clause| clause.split(',').next() == Some(facet))
            .unwrap_or(false),
        _ => false,
    }
}

/// Filter clause of a search body, empty when absent
pub fn filter_of(body: &Value) -> String {
    body["filter"].as_str().unwrap_or_default().to_string()
}
