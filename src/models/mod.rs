pub mod facet;
pub mod parameters;
pub mod response;
pub mod state;

pub use facet::{
    CheckboxFacet, CheckboxValue, FacetDataType, FacetDefinition, FacetFilter, FacetTerm,
    RangeFacet, RangeSelection, DEFAULT_CHECKBOX_COUNT,
};
pub use parameters::{
    ParametersState, QueryType, SearchMode, SearchParameters, SearchParametersUpdate,
    SuggestionsParameters, SuggestionsParametersUpdate, DEFAULT_API_VERSION, DEFAULT_TOP,
};
pub use response::{FacetCounts, FacetValue, SearchResponseBody, SuggestResponseBody};
pub use state::{FacetsState, ResultsState, SearchConfig, SearchState, SuggestionsState};
