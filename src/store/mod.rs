//! Observable search state container.
//!
//! [`SearchStore`] owns the only `SearchState` of a session. Every change is a
//! [`Transition`] reduced into a fresh `Arc<SearchState>` snapshot, after
//! which all subscribed listeners run synchronously in subscription order.
//! Snapshots are never mutated, so a reader holding an old one never sees a
//! partial update.
//!
//! ```no_run
//! use faceted_search_store::{models::SearchConfig, SearchStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SearchStore::new()?;
//!     store.set_config(SearchConfig::new("my-service", "docs", "query-key"));
//!     store.add_checkbox_facet("color", false);
//!     store.set_input("*");
//!
//!     let _subscription = store.subscribe(|| println!("state changed"));
//!     store.search().await;
//!
//!     println!("{} documents", store.get_state().results.documents.len());
//!     Ok(())
//! }
//! ```

mod operations;
pub mod reducer;
pub mod transition;

pub use transition::{ResultsMode, Transition};

use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::error::Result;
use crate::models::{
    CheckboxFacet, FacetDataType, FacetFilter, FacetTerm, RangeFacet, SearchConfig,
    SearchParametersUpdate, SearchState, SuggestionsParametersUpdate,
};
use crate::transport::{HttpTransport, Transport, DEFAULT_TIMEOUT_SECS};

/// Callback run after every applied transition
pub type Listener = Arc<dyn Fn() + Send + Sync>;

type ListenerList = Mutex<Vec<(u64, Listener)>>;

/// Handle returned by [`SearchStore::subscribe`]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// Stop receiving notifications. Dropping the handle keeps the listener
    /// subscribed.
    pub fn unsubscribe(self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Single owner of the session's search state
pub struct SearchStore {
    state: RwLock<Arc<SearchState>>,
    listeners: Arc<ListenerList>,
    next_listener_id: AtomicU64,
    transport: Arc<dyn Transport>,
}

impl SearchStore {
    /// Create a store using the default HTTP transport
    pub fn new() -> Result<Self> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT_SECS)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a store whose requests go through `transport` unless the
    /// configuration overrides it
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            state: RwLock::new(Arc::new(SearchState::default())),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicU64::new(0),
            transport,
        }
    }

    /// Current immutable snapshot
    pub fn get_state(&self) -> Arc<SearchState> {
        self.state.read().clone()
    }

    /// Register a listener invoked with no arguments after every transition
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Replace the state with `reduce(previous, transition)` and notify
    /// listeners. No lock is held while listeners run.
    pub(crate) fn apply(&self, transition: Transition) {
        let name = transition.name();
        {
            let mut state = self.state.write();
            let next = reducer::reduce(&state, transition);
            *state = Arc::new(next);
        }
        debug!(transition = name, "Applied transition");

        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn set_config(&self, config: SearchConfig) {
        self.apply(Transition::SetConfig(config));
    }

    pub fn update_search_parameters(&self, update: SearchParametersUpdate) {
        self.apply(Transition::UpdateSearchParameters(update));
    }

    pub fn set_input(&self, input: impl Into<String>) {
        self.apply(Transition::SetInput(input.into()));
    }

    /// Jump to a zero-based page
    pub fn set_page(&self, page: u32) {
        self.apply(Transition::SetPage(page));
    }

    pub fn increment_skip(&self) {
        self.apply(Transition::IncrementSkip);
    }

    /// Declare a string checkbox facet
    pub fn add_checkbox_facet(&self, name: impl Into<String>, multi_select: bool) {
        self.add_checkbox_facet_with(CheckboxFacet::new(name, FacetDataType::String, multi_select));
    }

    /// Declare a fully specified checkbox facet
    pub fn add_checkbox_facet_with(&self, facet: CheckboxFacet) {
        self.apply(Transition::AddCheckboxFacet(facet));
    }

    pub fn add_range_facet(&self, name: impl Into<String>, min: f64, max: f64) {
        self.apply(Transition::AddRangeFacet(RangeFacet::new(name, min, max)));
    }

    pub fn update_facet_filter(&self, name: impl Into<String>, filter: FacetFilter) {
        self.apply(Transition::UpdateFacetFilter {
            name: name.into(),
            filter,
        });
    }

    pub fn toggle_checkbox_facet_selection(
        &self,
        name: impl Into<String>,
        value: impl Into<FacetTerm>,
    ) {
        self.apply(Transition::ToggleCheckboxFacetSelection {
            name: name.into(),
            value: value.into(),
        });
    }

    pub fn set_facet_range(&self, name: impl Into<String>, lower: f64, upper: f64) {
        self.update_facet_filter(name, FacetFilter::Range { lower, upper });
    }

    pub fn clear_facets_selections(&self) {
        self.apply(Transition::ClearFacetsSelections);
    }

    pub fn update_suggestions_parameters(&self, update: SuggestionsParametersUpdate) {
        self.apply(Transition::UpdateSuggestionsParameters(update));
    }
}
