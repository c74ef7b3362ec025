//! State transitions
//!
//! A transition describes one change to `SearchState`. Caller-issued
//! transitions edit configuration, parameters and facets; operation-issued
//! transitions move a results or suggestions slice through
//! started → succeeded | failed.

use chrono::{DateTime, Utc};

use crate::models::{
    CheckboxFacet, FacetCounts, FacetFilter, FacetTerm, RangeFacet, SearchConfig,
    SearchParametersUpdate, SuggestionsParametersUpdate,
};

/// How a successful search updates the document list
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResultsMode {
    Replace,
    Append,
}

#[derive(Debug, Clone, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Transition {
    SetConfig(SearchConfig),
    UpdateSearchParameters(SearchParametersUpdate),
    SetInput(String),
    /// Jump to a zero-based page of `top` results
    SetPage(u32),
    /// Advance `skip` by one page
    IncrementSkip,
    /// Declare a facet; an existing facet of the same name is replaced in place
    AddCheckboxFacet(CheckboxFacet),
    AddRangeFacet(RangeFacet),
    UpdateFacetFilter {
        name: String,
        filter: FacetFilter,
    },
    ToggleCheckboxFacetSelection {
        name: String,
        value: FacetTerm,
    },
    ClearFacetsSelections,
    UpdateSuggestionsParameters(SuggestionsParametersUpdate),

    SearchStarted,
    SearchSucceeded {
        documents: Vec<serde_json::Value>,
        count: Option<u64>,
        facet_counts: FacetCounts,
        received_at: DateTime<Utc>,
        mode: ResultsMode,
    },
    SearchFailed {
        message: String,
    },

    SuggestStarted,
    SuggestSucceeded {
        suggestions: Vec<serde_json::Value>,
        received_at: DateTime<Utc>,
    },
    SuggestFailed {
        message: String,
    },
}

impl Transition {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}
