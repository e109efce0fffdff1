//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod init;
mod serve;
mod urls;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "page-analyzer")]
#[command(about = "Check websites for SEO suitability")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides ./page-analyzer.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database URL: `sqlite:<path>`, a file path, or `postgres://...`
    #[arg(long, global = true)]
    database_url: Option<String>,

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
    /// Start the web server
    Serve {
        /// Bind address: PORT, HOST or HOST:PORT [default: 127.0.0.1:8000]
        bind: Option<String>,
        /// Skip creating the database schema at start-up
        #[arg(long)]
        no_migrate: bool,
    },

    /// Create the database schema
    Init,

    /// Submit a URL
    Add {
        /// URL to add
        url: String,
    },

    /// Fetch a stored URL and record a check
    Check {
        /// URL id
        id: i64,
    },

    /// List all URLs with their latest check
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a URL and its check history
    Show {
        /// URL id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        database_url: cli.database_url,
        ..Default::default()
    };
    let settings = load_settings_with_options(options)?;

    match cli.command {
        Commands::Serve { bind, no_migrate } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind, !no_migrate).await
        }
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Add { url } => urls::cmd_add(&settings, &url).await,
        Commands::Check { id } => urls::cmd_check(&settings, id).await,
        Commands::Ls { json } => urls::cmd_ls(&settings, json).await,
        Commands::Show { id, json } => urls::cmd_show(&settings, id, json).await,
    }
}
