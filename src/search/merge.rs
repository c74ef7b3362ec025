//! Response aggregation: one primary response corrected by singlette counts

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::models::{FacetCounts, SearchResponseBody};

/// Primary documents and count with per-facet corrected counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MergedResult {
    pub documents: Vec<serde_json::Value>,
    pub count: Option<u64>,
    pub facet_counts: FacetCounts,
}

/// Merge a primary response with the singlette responses that succeeded.
///
/// Each singlette replaces only its own facet's entry. A facet with no
/// singlette, or whose singlette lacks an entry for it, keeps the primary
/// counts.
pub fn merge(
    primary: SearchResponseBody,
    singlettes: IndexMap<String, SearchResponseBody>,
) -> MergedResult {
    let mut facet_counts = primary.facets;

    for (name, mut singlette) in singlettes {
        match singlette.facets.shift_remove(&name) {
            Some(entries) => {
                facet_counts.insert(name, entries);
            }
            None => {
                debug!(facet = %name, "Singlette response has no counts for its facet");
            }
        }
    }

    MergedResult {
        documents: primary.value,
        count: primary.count,
        facet_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FacetValue;
    use serde_json::json;

    fn response(facets: serde_json::Value) -> SearchResponseBody {
        serde_json::from_value(json!({
            "value": [{"id": 1}],
            "@odata.count": 1,
            "@search.facets": facets,
        }))
        .unwrap()
    }

    #[test]
    fn test_merge_without_singlettes_is_identity() {
        let primary = response(json!({"color": [{"value": "red", "count": 3}]}));
        let merged = merge(primary.clone(), IndexMap::new());

        assert_eq!(merged.facet_counts, primary.facets);
        assert_eq!(merged.documents, primary.value);
        assert_eq!(merged.count, Some(1));
    }

    #[test]
    fn test_singlette_replaces_its_facet() {
        let primary = response(json!({
            "color": [{"value": "red", "count": 3}],
            "size": [{"value": "L", "count": 3}]
        }));
        let mut singlettes = IndexMap::new();
        singlettes.insert(
            "color".to_string(),
            response(json!({"color": [
                {"value": "red", "count": 10},
                {"value": "blue", "count": 4}
            ]})),
        );

        let merged = merge(primary, singlettes);
        assert_eq!(
            merged.facet_counts["color"],
            vec![FacetValue::discrete("red", 10), FacetValue::discrete("blue", 4)]
        );
        assert_eq!(merged.facet_counts["size"], vec![FacetValue::discrete("L", 3)]);
    }

    #[test]
    fn test_singlette_only_touches_own_key() {
        let primary = response(json!({
            "color": [{"value": "red", "count": 3}],
            "size": [{"value": "L", "count": 3}]
        }));
        let mut singlettes = IndexMap::new();
        singlettes.insert(
            "color".to_string(),
            response(json!({
                "color": [{"value": "red", "count": 9}],
                "size": [{"value": "L", "count": 99}]
            })),
        );

        let merged = merge(primary, singlettes);
        assert_eq!(merged.facet_counts["size"], vec![FacetValue::discrete("L", 3)]);
    }

    #[test]
    fn test_missing_entry_falls_back_to_primary() {
        let primary = response(json!({"color": [{"value": "red", "count": 3}]}));
        let mut singlettes = IndexMap::new();
        singlettes.insert("color".to_string(), response(json!({})));

        let merged = merge(primary, singlettes);
        assert_eq!(merged.facet_counts["color"], vec![FacetValue::discrete("red", 3)]);
    }

    #[test]
    fn test_merge_is_idempotent_per_facet() {
        let primary = response(json!({"color": [{"value": "red", "count": 3}]}));
        let singlette = response(json!({"color": [{"value": "red", "count": 10}]}));

        let mut once = IndexMap::new();
        once.insert("color".to_string(), singlette.clone());
        let merged_once = merge(primary.clone(), once);

        let mut twice = IndexMap::new();
        twice.insert("color".to_string(), singlette.clone());
        let first = merge(primary, twice);
        let mut again = IndexMap::new();
        again.insert("color".to_string(), singlette);
        let merged_twice = merge(
            SearchResponseBody {
                value: first.documents,
                count: first.count,
                facets: first.facet_counts,
            },
            again,
        );

        assert_eq!(merged_once, merged_twice);
    }
}
