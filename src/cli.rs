//! Command-line interface definitions for headline_relay.
//!
//! Every option can also be provided through an environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Command-line arguments for headline_relay.
///
/// # Examples
///
/// ```sh
/// # Serve the JSON API on the default address
/// headline_relay
///
/// # Serve with a custom source table
/// headline_relay --config ./sources.yaml serve --bind 0.0.0.0:8080
///
/// # One-shot run, saved under ./json/<date>/jtbc.json
/// headline_relay fetch jtbc -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a sources YAML file (the built-in sources otherwise)
    #[arg(short, long, env = "NEWS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Language headlines are translated into (overrides the config file)
    #[arg(long, env = "NEWS_TARGET_LANGUAGE", global = true)]
    pub target_language: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the JSON API (the default)
    Serve {
        /// Address to listen on
        #[arg(short, long, env = "NEWS_BIND", default_value = DEFAULT_BIND)]
        bind: String,
    },
    /// Run the pipeline once for a source and print or save its JSON payload
    Fetch {
        /// Source id, e.g. `yahoo`
        source_id: String,

        /// Output directory for the JSON snapshot (stdout when absent)
        #[arg(short, long)]
        json_output_dir: Option<String>,
    },
    /// List configured sources
    Sources,
}

impl Cli {
    /// The subcommand to run; `serve` on the default address when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or_else(|| Command::Serve {
            bind: std::env::var("NEWS_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_serve_bind() {
        let cli = Cli::parse_from(["headline_relay", "serve", "--bind", "0.0.0.0:8080"]);
        assert_eq!(cli.command(), Command::Serve { bind: "0.0.0.0:8080".to_string() });
    }

    #[test]
    fn test_cli_fetch_short_flags() {
        let cli = Cli::parse_from(["headline_relay", "-c", "/etc/sources.yaml", "fetch", "jtbc", "-j", "/tmp/json"]);

        assert_eq!(cli.config, Some(PathBuf::from("/etc/sources.yaml")));
        assert_eq!(
            cli.command(),
            Command::Fetch {
                source_id: "jtbc".to_string(),
                json_output_dir: Some("/tmp/json".to_string()),
            }
        );
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["headline_relay", "sources", "--target-language", "en"]);
        assert_eq!(cli.target_language.as_deref(), Some("en"));
        assert_eq!(cli.command(), Command::Sources);
    }

    #[test]
    fn test_cli_fetch_requires_source() {
        assert!(Cli::try_parse_from(["headline_relay", "fetch"]).is_err());
    }
}
