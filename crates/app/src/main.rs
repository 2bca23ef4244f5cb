//! Capview - Main Entry Point
//!
//! Loads a HAR or Burp Suite XML capture and prints entries, reconstructed
//! messages, curl commands and search results.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Inspect HAR and Burp Suite XML captures.
#[derive(Debug, Parser)]
#[command(name = "capview", version, about)]
struct Cli {
    /// Settings file (TOML). `CAPVIEW_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Capture file (`.har` or `.xml`).
    capture: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List entries, optionally filtered by a substring.
    List {
        /// Case-insensitive substring matched against URL, headers, bodies and comments.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show the reconstructed request and response of an entry.
    Show {
        /// Entry index.
        index: usize,
        /// Print bodies unformatted, one payload per block.
        #[arg(long)]
        raw: bool,
    },
    /// Print a curl command that replays an entry's request.
    Curl {
        /// Entry index.
        index: usize,
        /// Escape backslashes and single quotes inside quoted values.
        #[arg(long)]
        escape_quotes: bool,
    },
    /// Rank entries against a typo-tolerant query.
    Search {
        /// Query text.
        query: String,
        /// Maximum number of results.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Read queries from stdin, one per line, and rank entries for each.
    Interactive,
    /// Print the cookies set by an entry's response.
    Cookies {
        /// Entry index.
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = capview_infrastructure::load_settings(cli.config.as_deref())?;
    let session = commands::load(&cli.capture, &settings).await?;

    match cli.command {
        Command::List { filter } => commands::list(&session, &settings, filter.as_deref()),
        Command::Show { index, raw } => commands::show(&session, &settings, index, raw)?,
        Command::Curl {
            index,
            escape_quotes,
        } => commands::curl(&session, index, escape_quotes)?,
        Command::Search { query, limit } => {
            commands::search(&session, &settings, &query, limit).await?;
        }
        Command::Interactive => commands::interactive(&session, &settings).await?,
        Command::Cookies { index } => commands::cookies(&session, index)?,
    }

    Ok(())
}
