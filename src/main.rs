//! Binary entry point for wayfind.
//!
//! This binary provides the CLI interface for the wayfind search pipeline.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use wayfind::config::WayfindConfig;
use wayfind::llm::{LlmHttpConfig, OpenAiClient};
use wayfind::{NominatimClient, SearchRequest, SearchService, TaginfoClient, UserPosition};

/// Wayfind - natural-language place search.
#[derive(Parser)]
#[command(name = "wayfind")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Search for places.
    Search {
        /// The free-text query ("Italian restaurants near me").
        query: String,

        /// Caller latitude.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Caller longitude.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Return the expanded page (10 results instead of 5).
        #[arg(long)]
        expanded: bool,

        /// Emit the result set as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the resolved configuration.
    Config {
        /// Show the default config file path instead.
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = match WayfindConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Search {
            query,
            lat,
            lon,
            expanded,
            json,
        } => cmd_search(&config, query, lat.zip(lon), expanded, json),
        Commands::Config { path } => cmd_config(&config, path),
    }
}

/// Initializes the tracing subscriber with env-filter support.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_filter = if verbose { "wayfind=debug" } else { "wayfind=warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs a search and renders the result set.
fn cmd_search(
    config: &WayfindConfig,
    query: String,
    coordinates: Option<(f64, f64)>,
    expanded: bool,
    json: bool,
) -> ExitCode {
    let position = match coordinates {
        Some((lat, lon)) => match UserPosition::new(lat, lon) {
            Ok(position) => Some(position),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => None,
    };

    let mut llm = OpenAiClient::new().with_http_config(LlmHttpConfig::from_config(&config.llm));
    if let Some(model) = &config.llm.model {
        llm = llm.with_model(model);
    }
    if let Some(endpoint) = &config.llm.endpoint {
        llm = llm.with_endpoint(endpoint);
    }
    if let Some(api_key) = &config.llm.api_key {
        llm = llm.with_api_key(api_key);
    }

    let service = SearchService::new(
        Arc::new(llm),
        Arc::new(TaginfoClient::from_config(&config.tags)),
        Arc::new(NominatimClient::from_config(&config.geocoder)),
        config.search,
    );

    let mut request = SearchRequest::new(query).with_expanded(expanded);
    if let Some(position) = position {
        request = request.with_position(position);
    }

    let results = service.search(&request);

    if json {
        match serde_json::to_string_pretty(&results) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render results: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if results.is_empty() {
        println!("No locations found. Try broadening your query.");
        return ExitCode::SUCCESS;
    }

    for (index, result) in results.iter().enumerate() {
        match result.distance_km {
            Some(distance) => println!(
                "{}. {} ({distance:.1} km)",
                index + 1,
                result.display_name
            ),
            None => println!("{}. {}", index + 1, result.display_name),
        }
        println!("   {:.5}, {:.5}", result.latitude, result.longitude);
    }

    ExitCode::SUCCESS
}

/// Shows the resolved configuration (or the default path).
fn cmd_config(config: &WayfindConfig, path_only: bool) -> ExitCode {
    if path_only {
        match WayfindConfig::default_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("(no default config path on this platform)"),
        }
        return ExitCode::SUCCESS;
    }

    println!("llm.model = {:?}", config.llm.model);
    println!("llm.endpoint = {:?}", config.llm.endpoint);
    println!("llm.api_key = {}", if config.llm.api_key.is_some() { "(set)" } else { "(unset)" });
    println!("geocoder.base_url = {}", config.geocoder.base_url);
    println!("geocoder.timeout_ms = {}", config.geocoder.timeout_ms);
    println!("tags.base_url = {}", config.tags.base_url);
    println!("tags.timeout_ms = {}", config.tags.timeout_ms);
    println!("search.page_size = {}", config.search.page_size);
    println!(
        "search.expanded_page_size = {}",
        config.search.expanded_page_size
    );
    ExitCode::SUCCESS
}
