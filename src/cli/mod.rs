//! CLI parser and command dispatch.

mod config_cmd;
mod discover;
mod helpers;
mod location;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use dirscrape::config::Settings;

/// How scraped records are printed to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "dirscrape")]
#[command(about = "Scrape business listings from online directories")]
#[command(version)]
pub struct Cli {
    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Discover listing pages from a URL and extract business records
    Scrape {
        /// Directory listing URL to start from
        url: String,
        /// Maximum number of records to collect
        #[arg(short = 'n', long)]
        max: Option<usize>,
        /// API key for the completion service (overrides config and LLM_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Output format for stdout
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
        /// Also write records to a file (.json for JSON, CSV otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the pages that would be scraped for a URL (no model calls)
    Discover {
        /// Directory listing URL to start from
        url: String,
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Determine the city a directory page covers
    Location {
        /// Directory page URL
        url: String,
        /// API key for the completion service
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show the effective configuration
    Config,
}

/// Parse arguments, load settings, and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())
        .await?
        .with_env_overrides();

    match cli.command {
        Commands::Scrape {
            url,
            max,
            api_key,
            format,
            output,
        } => {
            let options = scrape::ScrapeOptions {
                max_records: max.unwrap_or(settings.scrape.max_records),
                api_key,
                format,
                output,
                verbose: cli.verbose,
            };
            scrape::cmd_scrape(&settings, &url, options).await
        }
        Commands::Discover { url, json } => discover::cmd_discover(&settings, &url, json).await,
        Commands::Location { url, api_key } => {
            location::cmd_location(&settings, &url, api_key.as_deref()).await
        }
        Commands::Config => config_cmd::cmd_config(&settings, cli.config.as_deref()),
    }
}
