//! Request planning.
//!
//! The service computes facet counts against the filtered result set, so a
//! facet with its own filter applied would only report counts for the values
//! already selected. For every facet the planner therefore derives a
//! "singlette" plan: the primary request with that facet's filter removed and
//! the facet-count list narrowed to that facet alone. Every other facet's
//! filter stays applied, which yields counts for `R(F - f)`.
//!
//! Planning is pure. Nothing here touches the network.

use indexmap::IndexMap;

use crate::models::parameters::{passthrough, RESERVED_SEARCH_KEYS, RESERVED_SUGGEST_KEYS};
use crate::models::{SearchParameters, SearchState, SuggestionsParameters};
use crate::query::body::{SearchRequestBody, SuggestRequestBody};

/// Everything needed to build one search request body
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub input: String,
    pub parameters: SearchParameters,
    /// Filter clause per facet in facet order; an empty clause means unfiltered
    pub facet_filters: IndexMap<String, String>,
    /// Facet-count clause per facet whose counts are requested
    pub facet_requests: IndexMap<String, String>,
}

impl QueryPlan {
    /// Conjunction of every non-empty facet filter clause
    pub fn filter(&self) -> Option<String> {
        let clauses: Vec<&str> = self
            .facet_filters
            .values()
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }

    pub fn body(&self) -> SearchRequestBody {
        let p = &self.parameters;
        SearchRequestBody {
            search: self.input.clone(),
            facets: self.facet_requests.values().cloned().collect(),
            filter: self.filter(),
            count: p.count,
            top: p.top,
            skip: p.skip,
            orderby: p.orderby.clone(),
            search_mode: p.search_mode,
            scoring_profile: p.scoring_profile.clone(),
            select: p.select.clone(),
            search_fields: p.search_fields.clone(),
            query_type: p.query_type,
            highlight: p.highlight.clone(),
            highlight_pre_tag: p.highlight_pre_tag.clone(),
            highlight_post_tag: p.highlight_post_tag.clone(),
            minimum_coverage: p.minimum_coverage,
            extra: passthrough(&p.extra, RESERVED_SEARCH_KEYS),
        }
    }

    /// Copy of this plan with `facet`'s own filter cleared and only its counts
    /// requested
    fn singlette(&self, facet: &str) -> QueryPlan {
        let mut plan = self.clone();
        if let Some(clause) = plan.facet_filters.get_mut(facet) {
            clause.clear();
        }
        plan.facet_requests.retain(|name, _| name == facet);
        plan
    }
}

/// Primary plan plus one singlette plan per declared facet
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub primary: QueryPlan,
    pub singlettes: IndexMap<String, QueryPlan>,
}

/// Build the primary and singlette plans for the current state
pub fn plan(state: &SearchState) -> SearchPlan {
    let facets = &state.facets.facets;

    let primary = QueryPlan {
        input: state.parameters.input.clone(),
        parameters: state.parameters.search_parameters.clone(),
        facet_filters: facets
            .iter()
            .map(|(name, facet)| (name.clone(), facet.filter_clause().to_string()))
            .collect(),
        facet_requests: facets
            .iter()
            .map(|(name, facet)| (name.clone(), facet.facet_clause().to_string()))
            .collect(),
    };

    let singlettes = facets
        .keys()
        .map(|name| (name.clone(), primary.singlette(name)))
        .collect();

    SearchPlan {
        primary,
        singlettes,
    }
}

/// Plan for a suggest request; suggestions never fan out
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestPlan {
    pub input: String,
    pub parameters: SuggestionsParameters,
}

impl SuggestPlan {
    pub fn body(&self) -> SuggestRequestBody {
        let p = &self.parameters;
        SuggestRequestBody {
            search: self.input.clone(),
            suggester_name: p.suggester_name.clone(),
            top: p.top,
            filter: p.filter.clone(),
            orderby: p.orderby.clone(),
            fuzzy: p.fuzzy,
            highlight_pre_tag: p.highlight_pre_tag.clone(),
            highlight_post_tag: p.highlight_post_tag.clone(),
            select: p.select.clone(),
            search_fields: p.search_fields.clone(),
            minimum_coverage: p.minimum_coverage,
            extra: passthrough(&p.extra, RESERVED_SUGGEST_KEYS),
        }
    }
}

pub fn plan_suggest(state: &SearchState) -> SuggestPlan {
    SuggestPlan {
        input: state.parameters.input.clone(),
        parameters: state.parameters.suggestions_parameters.clone(),
    }
}
