//! Pure state reduction: `(previous snapshot, transition) -> next snapshot`

use tracing::warn;

use crate::models::{FacetDefinition, SearchState};
use crate::store::transition::{ResultsMode, Transition};

/// Produce the snapshot that follows `state` under `transition`
pub fn reduce(state: &SearchState, transition: Transition) -> SearchState {
    let mut next = state.clone();

    match transition {
        Transition::SetConfig(config) => next.config = config,
        Transition::UpdateSearchParameters(update) => {
            update.apply_to(&mut next.parameters.search_parameters);
        }
        Transition::SetInput(input) => next.parameters.input = input,
        Transition::SetPage(page) => {
            let params = &mut next.parameters.search_parameters;
            params.skip = page.saturating_mul(params.top);
        }
        Transition::IncrementSkip => {
            let params = &mut next.parameters.search_parameters;
            params.skip = params.skip.saturating_add(params.top);
        }
        Transition::AddCheckboxFacet(facet) => {
            next.facets
                .facets
                .insert(facet.name.clone(), FacetDefinition::Checkbox(facet));
        }
        Transition::AddRangeFacet(facet) => {
            next.facets
                .facets
                .insert(facet.name.clone(), FacetDefinition::Range(facet));
        }
        Transition::UpdateFacetFilter { name, filter } => {
            match next.facets.facets.get_mut(&name) {
                Some(facet) => {
                    if !facet.apply_filter(&filter) {
                        warn!(facet = %name, "Filter kind does not match facet kind; ignored");
                    }
                }
                None => warn!(facet = %name, "Filter update for unknown facet; ignored"),
            }
        }
        Transition::ToggleCheckboxFacetSelection { name, value } => {
            match next.facets.facets.get_mut(&name) {
                Some(FacetDefinition::Checkbox(facet)) => facet.toggle(&value),
                Some(FacetDefinition::Range(_)) => {
                    warn!(facet = %name, "Cannot toggle a value on a range facet; ignored")
                }
                None => warn!(facet = %name, "Toggle for unknown facet; ignored"),
            }
        }
        Transition::ClearFacetsSelections => {
            for facet in next.facets.facets.values_mut() {
                facet.clear();
            }
        }
        Transition::UpdateSuggestionsParameters(update) => {
            update.apply_to(&mut next.parameters.suggestions_parameters);
        }

        Transition::SearchStarted => {
            next.results.in_flight = true;
            next.results.last_error = None;
        }
        Transition::SearchSucceeded {
            documents,
            count,
            facet_counts,
            received_at,
            mode,
        } => {
            match mode {
                ResultsMode::Replace => next.results.documents = documents,
                ResultsMode::Append => next.results.documents.extend(documents),
            }
            next.results.count = count;
            next.results.last_updated_at = Some(received_at);
            next.results.in_flight = false;
            next.results.last_error = None;

            for (name, entries) in &facet_counts {
                if let Some(facet) = next.facets.facets.get_mut(name) {
                    facet.update_counts(entries);
                }
            }
        }
        Transition::SearchFailed { message } => {
            next.results.in_flight = false;
            next.results.last_error = Some(message);
        }

        Transition::SuggestStarted => {
            next.suggestions.in_flight = true;
            next.suggestions.last_error = None;
        }
        Transition::SuggestSucceeded {
            suggestions,
            received_at,
        } => {
            next.suggestions.suggestions = suggestions;
            next.suggestions.last_updated_at = Some(received_at);
            next.suggestions.in_flight = false;
            next.suggestions.last_error = None;
        }
        Transition::SuggestFailed { message } => {
            next.suggestions.in_flight = false;
            next.suggestions.last_error = Some(message);
        }
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CheckboxFacet, FacetDataType, FacetFilter, FacetValue, RangeFacet, SearchParametersUpdate,
    };
    use chrono::Utc;
    use indexmap::IndexMap;
    use serde_json::json;

    fn succeeded(documents: Vec<serde_json::Value>, mode: ResultsMode) -> Transition {
        Transition::SearchSucceeded {
            documents,
            count: Some(42),
            facet_counts: IndexMap::new(),
            received_at: Utc::now(),
            mode,
        }
    }

    #[test]
    fn test_search_lifecycle() {
        let state = SearchState::default();

        let started = reduce(&state, Transition::SearchStarted);
        assert!(started.results.in_flight);

        let done = reduce(&started, succeeded(vec![json!({"id": 1})], ResultsMode::Replace));
        assert!(!done.results.in_flight);
        assert_eq!(done.results.documents, vec![json!({"id": 1})]);
        assert_eq!(done.results.count, Some(42));
        assert!(done.results.last_updated_at.is_some());
    }

    #[test]
    fn test_append_mode_extends_documents() {
        let state = reduce(
            &SearchState::default(),
            succeeded(vec![json!({"id": 1})], ResultsMode::Replace),
        );
        let state = reduce(&state, succeeded(vec![json!({"id": 2})], ResultsMode::Append));
        assert_eq!(state.results.documents, vec![json!({"id": 1}), json!({"id": 2})]);
    }

    #[test]
    fn test_failure_preserves_documents() {
        let state = reduce(
            &SearchState::default(),
            succeeded(vec![json!({"id": 1})], ResultsMode::Replace),
        );
        let state = reduce(&state, Transition::SearchStarted);
        let state = reduce(
            &state,
            Transition::SearchFailed {
                message: "timeout".to_string(),
            },
        );

        assert!(!state.results.in_flight);
        assert_eq!(state.results.last_error.as_deref(), Some("timeout"));
        assert_eq!(state.results.documents, vec![json!({"id": 1})]);

        let restarted = reduce(&state, Transition::SearchStarted);
        assert!(restarted.results.last_error.is_none());
    }

    #[test]
    fn test_suggest_lifecycle_is_independent_of_results() {
        let state = reduce(&SearchState::default(), Transition::SearchStarted);
        let state = reduce(&state, Transition::SuggestStarted);
        let state = reduce(
            &state,
            Transition::SuggestFailed {
                message: "offline".to_string(),
            },
        );

        assert!(state.results.in_flight);
        assert!(!state.suggestions.in_flight);
        assert_eq!(state.suggestions.last_error.as_deref(), Some("offline"));
    }

    #[test]
    fn test_paging() {
        let state = reduce(
            &SearchState::default(),
            Transition::UpdateSearchParameters(SearchParametersUpdate {
                top: Some(10),
                ..Default::default()
            }),
        );
        let state = reduce(&state, Transition::IncrementSkip);
        let state = reduce(&state, Transition::IncrementSkip);
        assert_eq!(state.parameters.search_parameters.skip, 20);

        let state = reduce(&state, Transition::SetPage(0));
        assert_eq!(state.parameters.search_parameters.skip, 0);
    }

    #[test]
    fn test_facet_transitions() {
        let state = reduce(
            &SearchState::default(),
            Transition::AddCheckboxFacet(CheckboxFacet::new("color", FacetDataType::String, true)),
        );
        let state = reduce(&state, Transition::AddRangeFacet(RangeFacet::new("price", 0.0, 10.0)));
        let state = reduce(
            &state,
            Transition::ToggleCheckboxFacetSelection {
                name: "color".to_string(),
                value: "red".into(),
            },
        );
        let state = reduce(
            &state,
            Transition::UpdateFacetFilter {
                name: "price".to_string(),
                filter: FacetFilter::Range {
                    lower: 1.0,
                    upper: 5.0,
                },
            },
        );

        assert_eq!(state.facets.filtered().count(), 2);
        let keys: Vec<&String> = state.facets.facets.keys().collect();
        assert_eq!(keys, vec!["color", "price"]);

        let cleared = reduce(&state, Transition::ClearFacetsSelections);
        assert_eq!(cleared.facets.filtered().count(), 0);
    }

    #[test]
    fn test_unknown_facet_filter_is_ignored() {
        let state = SearchState::default();
        let next = reduce(
            &state,
            Transition::UpdateFacetFilter {
                name: "missing".to_string(),
                filter: FacetFilter::Clear,
            },
        );
        assert!(next.facets.is_empty());
    }

    #[test]
    fn test_success_updates_facet_values() {
        let state = reduce(
            &SearchState::default(),
            Transition::AddCheckboxFacet(CheckboxFacet::new("color", FacetDataType::String, true)),
        );

        let mut facet_counts = IndexMap::new();
        facet_counts.insert(
            "color".to_string(),
            vec![FacetValue::discrete("red", 10), FacetValue::discrete("blue", 4)],
        );
        let state = reduce(
            &state,
            Transition::SearchSucceeded {
                documents: Vec::new(),
                count: None,
                facet_counts,
                received_at: Utc::now(),
                mode: ResultsMode::Replace,
            },
        );

        match state.facets.get("color") {
            Some(FacetDefinition::Checkbox(facet)) => {
                let counts: Vec<u64> = facet.values.iter().map(|v| v.count).collect();
                assert_eq!(counts, vec![10, 4]);
            }
            other => panic!("unexpected facet: {:?}", other),
        }
    }
}
