// src/main.rs
mod extractors;
mod notify;
mod resolver;
mod router;
mod sources;
mod utils;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notify::Notifier;
use resolver::FallbackChain;
use router::{RequestEvent, Router};
use sources::{client, DirectPageSource, NisabSource, RenderedPageSource, SearchEngineSource};
use utils::{AppConfig, AppError};

/// Serverless nisab lookup: serves GET/POST events and scrapes the current nisab value
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chrome/Chromium executable for the rendered strategy (overrides CHROME_EXECUTABLE)
    #[arg(long, global = true)]
    chrome_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Handle one serverless event and print the response as JSON
    Handle {
        /// Full event JSON, e.g. '{"httpMethod":"GET","queryStringParameters":{"resource":"zakat","region":"SG"}}'
        #[arg(long, conflicts_with = "file")]
        event: Option<String>,

        /// Read the event JSON from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// HTTP method when building the event from flags
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "query", value_parser = parse_key_val)]
        query: Vec<(String, String)>,

        /// Raw request body (POST)
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Run a single strategy, or the default chain, and print the value
    Strategy {
        #[arg(value_enum, default_value_t = StrategyChoice::Chain)]
        name: StrategyChoice,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyChoice {
    /// Plain GET of the source page
    Direct,
    /// Search-engine answer snippet
    Search,
    /// Headless browser rendering of the source page
    Rendered,
    /// Default fallback chain (search, then rendered)
    Chain,
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    // 3. Configuration is read once here and passed down
    let mut config = AppConfig::from_env()?;
    if let Some(path) = args.chrome_path {
        config.chrome_executable = Some(path);
    }

    let scraper_http = client::build_browser_client(&config)?;

    match args.command {
        Command::Handle { event, file, method, query, body } => {
            let event = match (event, file) {
                (Some(raw), _) => serde_json::from_str::<RequestEvent>(&raw)?,
                (None, Some(path)) => serde_json::from_str::<RequestEvent>(&std::fs::read_to_string(path)?)?,
                (None, None) => RequestEvent {
                    http_method: method,
                    query_string_parameters: Some(query.into_iter().collect::<HashMap<_, _>>()),
                    body,
                },
            };

            let alert_http = reqwest::Client::builder().timeout(config.http_timeout).build()?;
            let router = Router::new(
                FallbackChain::standard(&config, scraper_http),
                Notifier::from_config(&config, alert_http),
            );

            let response = router.handle(&event).await;
            println!("{}", serde_json::to_string(&response)?);
        }
        Command::Strategy { name } => {
            let value = match name {
                StrategyChoice::Chain => FallbackChain::standard(&config, scraper_http).resolve().await?,
                single => {
                    let source: Box<dyn NisabSource> = match single {
                        StrategyChoice::Direct => Box::new(DirectPageSource::new(scraper_http)),
                        StrategyChoice::Search => Box::new(SearchEngineSource::new(scraper_http)),
                        _ => Box::new(RenderedPageSource::new(&config)),
                    };
                    source.fetch_nisab().await?
                }
            };
            println!("{}", value);
        }
    }

    Ok(())
}
