//! The aggregate search state and its slices

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::models::facet::FacetDefinition;
use crate::models::parameters::ParametersState;
use crate::transport::Transport;

/// Connection settings for the remote search service.
///
/// The optional transports replace the store's default transport for the
/// search path and the suggest path independently.
#[derive(Clone, Default, Serialize)]
pub struct SearchConfig {
    /// Service name, the first label of the service host
    pub service: String,
    pub index: String,
    #[serde(skip_serializing)]
    pub query_key: String,
    /// Scheme and host replacing `https://{service}.search.windows.net`
    pub endpoint: Option<String>,
    #[serde(skip)]
    pub search_transport: Option<Arc<dyn Transport>>,
    #[serde(skip)]
    pub suggest_transport: Option<Arc<dyn Transport>>,
}

impl SearchConfig {
    pub fn new(
        service: impl Into<String>,
        index: impl Into<String>,
        query_key: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            index: index.into(),
            query_key: query_key.into(),
            ..Default::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_search_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.search_transport = Some(transport);
        self
    }

    pub fn with_suggest_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.suggest_transport = Some(transport);
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("service", &self.service)
            .field("index", &self.index)
            .field("query_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("search_transport", &self.search_transport.is_some())
            .field("suggest_transport", &self.suggest_transport.is_some())
            .finish()
    }
}

/// Declared facets keyed by field name, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetsState {
    pub facets: IndexMap<String, FacetDefinition>,
}

impl FacetsState {
    pub fn get(&self, name: &str) -> Option<&FacetDefinition> {
        self.facets.get(name)
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Names of facets with an active filter
    pub fn filtered(&self) -> impl Iterator<Item = &str> {
        self.facets
            .values()
            .filter(|f| f.is_filtered())
            .map(|f| f.name())
    }
}

/// Search results slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultsState {
    pub documents: Vec<serde_json::Value>,
    /// Total match count, present when the request asked for it
    pub count: Option<u64>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

/// Suggestions slice
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionsState {
    pub suggestions: Vec<serde_json::Value>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub in_flight: bool,
    pub last_error: Option<String>,
}

/// Aggregate root owned by `SearchStore`
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchState {
    pub config: SearchConfig,
    pub parameters: ParametersState,
    pub facets: FacetsState,
    pub results: ResultsState,
    pub suggestions: SuggestionsState,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::facet::{CheckboxFacet, FacetDataType, FacetFilter, RangeFacet};

    #[test]
    fn test_config_debug_redacts_key() {
        let config = SearchConfig::new("svc", "docs", "secret-key");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("docs"));
    }

    #[test]
    fn test_config_serialization_skips_key() {
        let config = SearchConfig::new("svc", "docs", "secret-key");
        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("query_key").is_none());
        assert_eq!(json["index"], "docs");
    }

    #[test]
    fn test_filtered_facets() {
        let mut state = FacetsState::default();
        let mut color = FacetDefinition::Checkbox(CheckboxFacet::new(
            "color",
            FacetDataType::String,
            true,
        ));
        color.apply_filter(&FacetFilter::Values(vec!["red".into()]));
        state.facets.insert("color".to_string(), color);
        state.facets.insert(
            "price".to_string(),
            FacetDefinition::Range(RangeFacet::new("price", 0.0, 10.0)),
        );

        let filtered: Vec<&str> = state.filtered().collect();
        assert_eq!(filtered, vec!["color"]);
        assert_eq!(state.len(), 2);
    }
}
