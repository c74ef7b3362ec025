//! Request URI construction

use crate::models::SearchConfig;

fn base_url(config: &SearchConfig) -> String {
    match &config.endpoint {
        Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
        None => format!("https://{}.search.windows.net", config.service),
    }
}

/// URI of the index's search endpoint
pub fn search_uri(config: &SearchConfig, api_version: &str) -> String {
    format!(
        "{}/indexes/{}/docs/search?api-version={}",
        base_url(config),
        config.index,
        api_version
    )
}

/// URI of the index's suggest endpoint
pub fn suggest_uri(config: &SearchConfig, api_version: &str) -> String {
    format!(
        "{}/indexes/{}/docs/suggest?api-version={}",
        base_url(config),
        config.index,
        api_version
    )
}
