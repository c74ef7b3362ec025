//! Wire request bodies posted to the search service

use serde::{Deserialize, Serialize};

use crate::models::{QueryType, SearchMode};

/// Body of a search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestBody {
    pub search: String,

    /// Facet-count requests, one clause per facet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    pub count: bool,
    pub top: u32,
    pub skip: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,

    pub search_mode: SearchMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_profile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<String>,

    pub query_type: QueryType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_pre_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_post_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_coverage: Option<f64>,

    /// Vendor-specific passthrough keys
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Body of a suggest request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequestBody {
    pub search: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggester_name: Option<String>,

    pub top: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,

    pub fuzzy: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_pre_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_post_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_fields: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_coverage: Option<f64>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
