//! # headline_relay
//!
//! Fetches the front pages of foreign-language news portals, extracts
//! headline/link pairs, categorizes them by keyword, translates them into a
//! target language and serves the result as JSON for a browser UI.
//!
//! ## Usage
//!
//! ```sh
//! headline_relay                     # serve on 127.0.0.1:3000
//! headline_relay fetch ifeng -j ./json
//! ```
//!
//! ## Architecture
//!
//! Each request runs one parameterized pipeline keyed by a source descriptor:
//! 1. **Fetching**: download the source's front page
//! 2. **Extracting**: configured CSS selectors, then anchor and text-line fallbacks
//! 3. **Normalizing**: absolute links, bounded titles, dedup, cap
//! 4. **Translating**: concurrent, best-effort, joined before responding
//! 5. **Assembling**: items, category counts and timestamps as JSON

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod categorize;
mod cli;
mod config;
mod error;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
mod server;
mod translate;
mod utils;

#[cfg(test)]
mod test_support;

use cli::{Cli, Command};
use config::Config;
use outputs::json;
use pipeline::{Pipeline, failure_response};
use scrapers::HtmlFetcher;
use translate::MyMemoryTranslator;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(lang) = args.target_language.clone() {
        info!(%lang, "Overriding translation target language");
        config.translation.target_language = lang;
    }

    let fetcher = HtmlFetcher::new(&config.http)?;
    let translator = MyMemoryTranslator::new(
        config.translation.endpoint.clone(),
        Duration::from_secs(config.http.timeout_secs),
    )?;
    let pipeline = Arc::new(Pipeline::new(Arc::new(config), fetcher, translator));

    match args.command() {
        Command::Serve { bind } => server::serve(pipeline, &bind).await?,
        Command::Fetch {
            source_id,
            json_output_dir,
        } => fetch_once(&pipeline, &source_id, json_output_dir.as_deref()).await?,
        Command::Sources => {
            for s in &pipeline.config().sources {
                println!("{}\t{}\t{}\t{}", s.id, s.name, s.language, s.url);
            }
        }
    }

    Ok(())
}

/// Run the pipeline once and print or save the payload.
async fn fetch_once(
    pipeline: &Pipeline<MyMemoryTranslator>,
    source_id: &str,
    json_output_dir: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let source = pipeline.config().source(source_id)?;

    // Early check: ensure JSON output dir is writable before fetching anything
    if let Some(dir) = json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e.into());
        }
    }

    let response = match pipeline.run(source).await {
        Ok(response) => response,
        Err(failure) => {
            let payload = failure_response(format!("Failed to fetch news from {}", source.name), &failure.error);
            println!("{}", serde_json::to_string_pretty(&payload)?);
            return Err(failure.into());
        }
    };

    match json_output_dir {
        Some(dir) => {
            let path = json::write_response(&response, dir).await?;
            info!(path = %path.display(), "Snapshot written");
        }
        None => println!("{}", serde_json::to_string_pretty(&response)?),
    }
    Ok(())
}
