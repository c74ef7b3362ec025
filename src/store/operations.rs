//! Asynchronous search and suggest operations.
//!
//! Each operation reads one snapshot, plans and builds every request from it,
//! and applies its started transition before returning the future. The future
//! only waits for the calls and applies exactly one terminal transition;
//! failures end up in `last_error` and never escape to the caller.

use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use super::{ResultsMode, SearchStore, Transition};
use crate::models::{SearchResponseBody, SearchState, SuggestResponseBody};
use crate::query::{self, search_uri, suggest_uri};
use crate::search::{merge, FanOut};
use crate::transport::{request_headers, Transport, TransportRequest, TransportResult};

/// Encode `body`, execute it and decode the response
async fn execute_json<B, T>(
    transport: Arc<dyn Transport>,
    state: Arc<SearchState>,
    uri: String,
    body: B,
) -> TransportResult<T>
where
    B: Serialize,
    T: DeserializeOwned,
{
    let request = TransportRequest {
        headers: request_headers(&state.config.query_key),
        body: serde_json::to_value(&body)?,
        uri,
        state,
    };
    transport.execute(request).await?.json::<T>()
}

/// Build a call from one snapshot without polling it
fn issue<B, T>(
    transport: Arc<dyn Transport>,
    state: Arc<SearchState>,
    uri: String,
    body: B,
) -> BoxFuture<'static, TransportResult<T>>
where
    B: Serialize + Send + 'static,
    T: DeserializeOwned + Send + 'static,
{
    execute_json(transport, state, uri, body).boxed()
}

impl SearchStore {
    /// Run a search and replace the current documents
    pub fn search(&self) -> impl Future<Output = ()> + Send + '_ {
        self.run_search(ResultsMode::Replace)
    }

    /// Advance one page and append its documents to the current ones
    pub fn load_more(&self) -> impl Future<Output = ()> + Send + '_ {
        self.apply(Transition::IncrementSkip);
        self.run_search(ResultsMode::Append)
    }

    fn run_search(&self, mode: ResultsMode) -> impl Future<Output = ()> + Send + '_ {
        let snapshot = self.get_state();
        let plan = query::plan(&snapshot);
        let transport = snapshot
            .config
            .search_transport
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.transport));
        let uri = search_uri(
            &snapshot.config,
            &snapshot.parameters.search_parameters.api_version,
        );

        let primary: BoxFuture<'static, TransportResult<SearchResponseBody>> = issue(
            Arc::clone(&transport),
            Arc::clone(&snapshot),
            uri.clone(),
            plan.primary.body(),
        );

        let mut singlettes = FanOut::new();
        for (facet, singlette) in &plan.singlettes {
            singlettes.push(
                facet.clone(),
                issue(
                    Arc::clone(&transport),
                    Arc::clone(&snapshot),
                    uri.clone(),
                    singlette.body(),
                ),
            );
        }

        info!(
            input = %snapshot.parameters.input,
            singlettes = singlettes.len(),
            mode = %mode,
            "Search started"
        );
        self.apply(Transition::SearchStarted);

        async move {
            let (primary, settled) = futures::join!(primary, singlettes.settle());

            let mut corrections = IndexMap::new();
            for (facet, outcome) in settled {
                match outcome {
                    Ok(body) => {
                        corrections.insert(facet, body);
                    }
                    Err(e) => {
                        warn!(
                            facet = %facet,
                            error = %e,
                            "Facet count request failed; keeping primary counts"
                        );
                    }
                }
            }

            match primary {
                Ok(body) => {
                    let merged = merge(body, corrections);
                    info!(
                        documents = merged.documents.len(),
                        count = ?merged.count,
                        "Search succeeded"
                    );
                    self.apply(Transition::SearchSucceeded {
                        documents: merged.documents,
                        count: merged.count,
                        facet_counts: merged.facet_counts,
                        received_at: Utc::now(),
                        mode,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Search failed");
                    self.apply(Transition::SearchFailed {
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Fetch type-ahead suggestions for the current input
    pub fn suggest(&self) -> impl Future<Output = ()> + Send + '_ {
        let snapshot = self.get_state();
        let plan = query::plan_suggest(&snapshot);
        let transport = snapshot
            .config
            .suggest_transport
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.transport));
        let uri = suggest_uri(&snapshot.config, &plan.parameters.api_version);

        let call: BoxFuture<'static, TransportResult<SuggestResponseBody>> =
            issue(transport, Arc::clone(&snapshot), uri, plan.body());

        info!(input = %plan.input, "Suggest started");
        self.apply(Transition::SuggestStarted);

        async move {
            match call.await {
                Ok(body) => {
                    info!(suggestions = body.value.len(), "Suggest succeeded");
                    self.apply(Transition::SuggestSucceeded {
                        suggestions: body.value,
                        received_at: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Suggest failed");
                    self.apply(Transition::SuggestFailed {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}
