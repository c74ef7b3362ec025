//! Search and suggestion parameters plus their partial updates

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Service API version used when none is configured
pub const DEFAULT_API_VERSION: &str = "2016-09-01";

/// Default page size for search requests
pub const DEFAULT_TOP: u32 = 50;

/// Default number of suggestions requested
pub const DEFAULT_SUGGEST_TOP: u32 = 5;

/// Search body keys owned by the planner; passthrough entries cannot set them
pub const RESERVED_SEARCH_KEYS: &[&str] = &[
    "search",
    "facets",
    "filter",
    "count",
    "top",
    "skip",
    "orderby",
    "searchMode",
    "scoringProfile",
    "select",
    "searchFields",
    "queryType",
    "highlight",
    "highlightPreTag",
    "highlightPostTag",
    "minimumCoverage",
];

/// Suggest body keys owned by the planner
pub const RESERVED_SUGGEST_KEYS: &[&str] = &[
    "search",
    "suggesterName",
    "top",
    "filter",
    "orderby",
    "fuzzy",
    "select",
    "searchFields",
    "highlightPreTag",
    "highlightPostTag",
    "minimumCoverage",
];

/// Whether any or all search terms must match
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Any,
    All,
}

/// Query syntax understood by the service
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueryType {
    #[default]
    Simple,
    Full,
}

/// Parameters shaping a search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    /// Ask the service for the total match count
    pub count: bool,
    pub top: u32,
    /// Page offset
    pub skip: u32,
    pub orderby: Option<String>,
    pub search_mode: SearchMode,
    pub scoring_profile: Option<String>,
    pub select: Option<String>,
    pub search_fields: Option<String>,
    pub query_type: QueryType,
    pub highlight: Option<String>,
    pub highlight_pre_tag: Option<String>,
    pub highlight_post_tag: Option<String>,
    pub minimum_coverage: Option<f64>,
    pub api_version: String,
    /// Vendor-specific keys passed through to the request body verbatim
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            count: false,
            top: DEFAULT_TOP,
            skip: 0,
            orderby: None,
            search_mode: SearchMode::default(),
            scoring_profile: None,
            select: None,
            search_fields: None,
            query_type: QueryType::default(),
            highlight: None,
            highlight_pre_tag: None,
            highlight_post_tag: None,
            minimum_coverage: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Partial update of `SearchParameters`; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParametersUpdate {
    pub count: Option<bool>,
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub orderby: Option<String>,
    pub search_mode: Option<SearchMode>,
    pub scoring_profile: Option<String>,
    pub select: Option<String>,
    pub search_fields: Option<String>,
    pub query_type: Option<QueryType>,
    pub highlight: Option<String>,
    pub highlight_pre_tag: Option<String>,
    pub highlight_post_tag: Option<String>,
    pub minimum_coverage: Option<f64>,
    pub api_version: Option<String>,
    /// Merged key by key into `SearchParameters::extra`
    pub extra: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SearchParametersUpdate {
    pub fn apply_to(&self, params: &mut SearchParameters) {
        if let Some(count) = self.count {
            params.count = count;
        }
        if let Some(top) = self.top {
            params.top = top;
        }
        if let Some(skip) = self.skip {
            params.skip = skip;
        }
        if let Some(mode) = self.search_mode {
            params.search_mode = mode;
        }
        if let Some(query_type) = self.query_type {
            params.query_type = query_type;
        }
        if let Some(coverage) = self.minimum_coverage {
            params.minimum_coverage = Some(coverage);
        }
        if let Some(version) = &self.api_version {
            params.api_version = version.clone();
        }
        merge_string(&mut params.orderby, &self.orderby);
        merge_string(&mut params.scoring_profile, &self.scoring_profile);
        merge_string(&mut params.select, &self.select);
        merge_string(&mut params.search_fields, &self.search_fields);
        merge_string(&mut params.highlight, &self.highlight);
        merge_string(&mut params.highlight_pre_tag, &self.highlight_pre_tag);
        merge_string(&mut params.highlight_post_tag, &self.highlight_post_tag);
        merge_extra(&mut params.extra, &self.extra, RESERVED_SEARCH_KEYS);
    }
}

/// Parameters shaping a suggest request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsParameters {
    pub top: u32,
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub fuzzy: bool,
    pub highlight_pre_tag: Option<String>,
    pub highlight_post_tag: Option<String>,
    pub select: Option<String>,
    pub search_fields: Option<String>,
    pub minimum_coverage: Option<f64>,
    pub suggester_name: Option<String>,
    pub api_version: String,
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for SuggestionsParameters {
    fn default() -> Self {
        Self {
            top: DEFAULT_SUGGEST_TOP,
            filter: None,
            orderby: None,
            fuzzy: false,
            highlight_pre_tag: None,
            highlight_post_tag: None,
            select: None,
            search_fields: None,
            minimum_coverage: None,
            suggester_name: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Partial update of `SuggestionsParameters`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsParametersUpdate {
    pub top: Option<u32>,
    pub filter: Option<String>,
    pub orderby: Option<String>,
    pub fuzzy: Option<bool>,
    pub highlight_pre_tag: Option<String>,
    pub highlight_post_tag: Option<String>,
    pub select: Option<String>,
    pub search_fields: Option<String>,
    pub minimum_coverage: Option<f64>,
    pub suggester_name: Option<String>,
    pub api_version: Option<String>,
    pub extra: Option<serde_json::Map<String, serde_json::Value>>,
}

impl SuggestionsParametersUpdate {
    pub fn apply_to(&self, params: &mut SuggestionsParameters) {
        if let Some(top) = self.top {
            params.top = top;
        }
        if let Some(fuzzy) = self.fuzzy {
            params.fuzzy = fuzzy;
        }
        if let Some(coverage) = self.minimum_coverage {
            params.minimum_coverage = Some(coverage);
        }
        if let Some(version) = &self.api_version {
            params.api_version = version.clone();
        }
        merge_string(&mut params.filter, &self.filter);
        merge_string(&mut params.orderby, &self.orderby);
        merge_string(&mut params.highlight_pre_tag, &self.highlight_pre_tag);
        merge_string(&mut params.highlight_post_tag, &self.highlight_post_tag);
        merge_string(&mut params.select, &self.select);
        merge_string(&mut params.search_fields, &self.search_fields);
        merge_string(&mut params.suggester_name, &self.suggester_name);
        merge_extra(&mut params.extra, &self.extra, RESERVED_SUGGEST_KEYS);
    }
}

fn merge_string(target: &mut Option<String>, update: &Option<String>) {
    if let Some(value) = update {
        *target = Some(value.clone());
    }
}

fn merge_extra(
    target: &mut serde_json::Map<String, serde_json::Value>,
    update: &Option<serde_json::Map<String, serde_json::Value>>,
    reserved: &[&str],
) {
    let Some(update) = update else {
        return;
    };
    for (key, value) in update {
        if reserved.contains(&key.as_str()) {
            warn!(key = %key, "Passthrough parameter names a computed request key; ignored");
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// Passthrough entries of `extra` that do not collide with `reserved` keys
pub fn passthrough(
    extra: &serde_json::Map<String, serde_json::Value>,
    reserved: &[&str],
) -> serde_json::Map<String, serde_json::Value> {
    extra
        .iter()
        .filter(|(key, _)| !reserved.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Input text plus the parameters of both request kinds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParametersState {
    pub input: String,
    pub search_parameters: SearchParameters,
    pub suggestions_parameters: SuggestionsParameters,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_update_touches_only_given_fields() {
        let mut params = SearchParameters::default();
        let update = SearchParametersUpdate {
            count: Some(true),
            orderby: Some("rating desc".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut params);

        assert!(params.count);
        assert_eq!(params.orderby.as_deref(), Some("rating desc"));
        assert_eq!(params.top, DEFAULT_TOP);
        assert_eq!(params.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_extra_parameters_merge() {
        let mut params = SearchParameters::default();
        let mut first = serde_json::Map::new();
        first.insert("answers".to_string(), json!("extractive"));
        SearchParametersUpdate {
            extra: Some(first),
            ..Default::default()
        }
        .apply_to(&mut params);

        let mut second = serde_json::Map::new();
        second.insert("semanticConfiguration".to_string(), json!("default"));
        SearchParametersUpdate {
            extra: Some(second),
            ..Default::default()
        }
        .apply_to(&mut params);

        assert_eq!(params.extra.len(), 2);
        assert_eq!(params.extra["answers"], json!("extractive"));
    }

    #[test]
    fn test_extra_cannot_set_computed_keys() {
        let mut extra = serde_json::Map::new();
        extra.insert("filter".to_string(), json!("rating gt 3"));
        extra.insert("facets".to_string(), json!([]));
        extra.insert("answers".to_string(), json!("extractive"));

        let mut search = SearchParameters::default();
        SearchParametersUpdate {
            extra: Some(extra.clone()),
            ..Default::default()
        }
        .apply_to(&mut search);
        assert_eq!(search.extra.len(), 1);
        assert_eq!(search.extra["answers"], json!("extractive"));

        let mut suggest = SuggestionsParameters::default();
        SuggestionsParametersUpdate {
            extra: Some(extra),
            ..Default::default()
        }
        .apply_to(&mut suggest);
        assert!(suggest.extra.contains_key("facets"));
        assert!(!suggest.extra.contains_key("filter"));
    }

    #[test]
    fn test_suggestions_update() {
        let mut params = SuggestionsParameters::default();
        SuggestionsParametersUpdate {
            suggester_name: Some("titleSuggester".to_string()),
            fuzzy: Some(true),
            ..Default::default()
        }
        .apply_to(&mut params);

        assert_eq!(params.suggester_name.as_deref(), Some("titleSuggester"));
        assert!(params.fuzzy);
        assert_eq!(params.top, DEFAULT_SUGGEST_TOP);
    }

    #[test]
    fn test_search_mode_strings() {
        assert_eq!(SearchMode::All.to_string(), "all");
        assert_eq!("full".parse::<QueryType>().unwrap(), QueryType::Full);
    }
}
