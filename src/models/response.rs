//! Typed bodies returned by the remote search service

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Facet-count entries keyed by facet name
pub type FacetCounts = IndexMap<String, Vec<FacetValue>>;

/// One entry of a facet-count list.
///
/// Discrete facets report `value`; range facets report `from` and/or `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<f64>,
    #[serde(default)]
    pub count: u64,
}

impl FacetValue {
    /// Entry for a discrete value
    pub fn discrete(value: impl Into<serde_json::Value>, count: u64) -> Self {
        Self {
            value: Some(value.into()),
            from: None,
            to: None,
            count,
        }
    }
}

/// Body of a search response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponseBody {
    #[serde(default)]
    pub value: Vec<serde_json::Value>,

    #[serde(rename = "@odata.count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    #[serde(rename = "@search.facets", default)]
    pub facets: FacetCounts,
}

/// Body of a suggest response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestResponseBody {
    #[serde(default)]
    pub value: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_response() {
        let body: SearchResponseBody = serde_json::from_value(json!({
            "@odata.count": 12,
            "@search.facets": {
                "color": [{"value": "red", "count": 3}],
                "price": [{"to": 0, "count": 1}, {"from": 0, "to": 100, "count": 11}]
            },
            "value": [{"id": 1}]
        }))
        .unwrap();

        assert_eq!(body.count, Some(12));
        assert_eq!(body.value, vec![json!({"id": 1})]);
        assert_eq!(body.facets["color"], vec![FacetValue::discrete("red", 3)]);
        assert_eq!(body.facets["price"][1].from, Some(0.0));
    }

    #[test]
    fn test_parse_minimal_response() {
        let body: SearchResponseBody = serde_json::from_value(json!({"value": []})).unwrap();
        assert_eq!(body.count, None);
        assert!(body.facets.is_empty());
    }
}
