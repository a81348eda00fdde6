//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod import;
mod init;
mod scrape;
mod serve;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "cine")]
#[command(about = "Movie listing acquisition and exploration system")]
#[command(version)]
pub struct Cli {
    /// Data directory or database file (overrides config file).
    /// Can be a directory containing cinescrape.db or a .db file directly.
    #[arg(long, short = 't', global = true)]
    data: Option<PathBuf>,

    /// Config file path (overrides discovery)
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
    /// Initialize the data directory and database
    Init,

    /// Scrape movie listings for one or more genres
    Scrape {
        /// Genre tags to scrape (defaults to the configured set)
        genres: Vec<String>,
        /// Scrape all configured genres
        #[arg(short, long)]
        all: bool,
        /// Limit number of listing pages per genre (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        pages: usize,
    },

    /// Append movie rows from other cinescrape databases
    Import {
        /// Database files to import from
        databases: Vec<PathBuf>,
    },

    /// Print aggregate views of the stored dataset
    Stats,

    /// Start web server to explore the dataset
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },
}

/// Parse arguments, load settings, and dispatch to the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        data: cli.data.clone(),
    };
    let (settings, _config) = load_settings_with_options(options).await;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Scrape { genres, all, pages } => {
            scrape::cmd_scrape(&settings, &genres, all, pages).await
        }
        Commands::Import { databases } => import::cmd_import(&settings, &databases).await,
        Commands::Stats => stats::cmd_stats(&settings).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
    }
}
