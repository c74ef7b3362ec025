use anyhow::Context;
use clap::{Parser, Subcommand};
use faceted_search_store::{
    config::Config,
    models::{CheckboxFacet, FacetDataType, SearchParametersUpdate, SuggestionsParametersUpdate},
    transport::HttpTransport,
    SearchStore,
};
use std::sync::{Arc, Weak};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "faceted-search-store")]
#[command(about = "Faceted search against a remote search service", long_about = None)]
struct Cli {
    /// Override file layered over the built-in defaults
    #[arg(short, long, env = "FSS_CONFIG_PATH", default_value = "config/local.toml")]
    config: String,

    /// Index to query (overrides configuration)
    #[arg(short, long)]
    index: Option<String>,

    /// Scheme and host of the service (overrides configuration)
    #[arg(short, long)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a faceted search
    Search {
        #[arg(value_name = "TEXT", default_value = "*")]
        text: String,

        /// Checkbox facet: NAME[:TYPE[:multi]] with TYPE string|number|collection
        #[arg(long = "checkbox", value_parser = parse_checkbox)]
        checkboxes: Vec<CheckboxFacet>,

        /// Range facet: NAME:MIN:MAX
        #[arg(long = "range", value_parser = parse_range)]
        ranges: Vec<(String, f64, f64)>,

        /// Select a checkbox value: NAME=VALUE
        #[arg(long = "select", value_parser = parse_selection)]
        selections: Vec<(String, String)>,

        /// Restrict a range facet: NAME:LOWER:UPPER
        #[arg(long = "between", value_parser = parse_range)]
        between: Vec<(String, f64, f64)>,

        #[arg(short, long)]
        top: Option<u32>,

        /// Request the total match count
        #[arg(long)]
        count: bool,

        #[arg(short, long)]
        orderby: Option<String>,

        /// Extra pages to append after the first
        #[arg(short = 'm', long, default_value = "0")]
        more: u32,
    },

    /// Fetch type-ahead suggestions
    Suggest {
        #[arg(value_name = "TEXT")]
        text: String,

        #[arg(short, long)]
        suggester: String,

        #[arg(short, long)]
        fuzzy: bool,

        #[arg(short, long)]
        top: Option<u32>,
    },
}

fn parse_checkbox(raw: &str) -> Result<CheckboxFacet, String> {
    let mut parts = raw.split(':');
    let name = parts
        .next()
        .filter(|n| !n.is_empty())
        .ok_or_else(|| format!("missing facet name in '{}'", raw))?;
    let data_type = match parts.next() {
        Some(t) => t
            .parse::<FacetDataType>()
            .map_err(|_| format!("unknown facet type '{}'", t))?,
        None => FacetDataType::String,
    };
    let multi_select = matches!(parts.next(), Some("multi"));
    Ok(CheckboxFacet::new(name, data_type, multi_select))
}

fn parse_range(raw: &str) -> Result<(String, f64, f64), String> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("expected NAME:MIN:MAX, got '{}'", raw));
    }
    let low = parts[1]
        .parse::<f64>()
        .map_err(|e| format!("invalid bound '{}': {}", parts[1], e))?;
    let high = parts[2]
        .parse::<f64>()
        .map_err(|e| format!("invalid bound '{}': {}", parts[2], e))?;
    Ok((parts[0].to_string(), low, high))
}

fn parse_selection(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_from(&cli.config).context("Failed to load configuration")?;
    if let Some(index) = cli.index {
        config.service.index = index;
    }
    if let Some(endpoint) = cli.endpoint {
        config.service.endpoint = Some(endpoint);
    }

    // Initialize tracing
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting faceted-search-store v{}", env!("CARGO_PKG_VERSION"));

    let transport = HttpTransport::new(config.http.timeout_secs)?;
    let store = Arc::new(SearchStore::with_transport(Arc::new(transport)));

    let observed: Weak<SearchStore> = Arc::downgrade(&store);
    let _subscription = store.subscribe(move || {
        if let Some(store) = observed.upgrade() {
            let state = store.get_state();
            tracing::debug!(
                input = %state.parameters.input,
                results_in_flight = state.results.in_flight,
                documents = state.results.documents.len(),
                suggestions_in_flight = state.suggestions.in_flight,
                "State changed"
            );
        }
    });

    store.set_config(config.search_config()?);
    store.update_search_parameters(SearchParametersUpdate {
        api_version: Some(config.service.api_version.clone()),
        ..Default::default()
    });
    store.update_suggestions_parameters(SuggestionsParametersUpdate {
        api_version: Some(config.service.api_version.clone()),
        ..Default::default()
    });

    match cli.command {
        Commands::Search {
            text,
            checkboxes,
            ranges,
            selections,
            between,
            top,
            count,
            orderby,
            more,
        } => {
            store.update_search_parameters(SearchParametersUpdate {
                count: Some(count),
                top,
                orderby,
                ..Default::default()
            });
            for facet in checkboxes {
                store.add_checkbox_facet_with(facet);
            }
            for (name, min, max) in ranges {
                store.add_range_facet(name, min, max);
            }
            for (name, value) in selections {
                store.toggle_checkbox_facet_selection(name, value);
            }
            for (name, lower, upper) in between {
                store.set_facet_range(name, lower, upper);
            }
            store.set_input(text);

            store.search().await;
            for _ in 0..more {
                store.load_more().await;
            }

            let state = store.get_state();
            if let Some(error) = &state.results.last_error {
                tracing::error!(error = %error, "Search failed");
            }
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "results": state.results,
                    "facets": state.facets,
                }))?
            );
        }

        Commands::Suggest {
            text,
            suggester,
            fuzzy,
            top,
        } => {
            store.update_suggestions_parameters(SuggestionsParametersUpdate {
                suggester_name: Some(suggester),
                fuzzy: Some(fuzzy),
                top,
                ..Default::default()
            });
            store.set_input(text);

            store.suggest().await;

            let state = store.get_state();
            if let Some(error) = &state.suggestions.last_error {
                tracing::error!(error = %error, "Suggest failed");
            }
            println!("{}", serde_json::to_string_pretty(&state.suggestions)?);
        }
    }

    Ok(())
}
