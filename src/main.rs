//! # webshell - Terminal client for a web shell backend
//!
//! Split shell panes that run commands on the backend, plus a live process
//! overlay with search, multi-select and cancellation.

mod app;
mod client;
mod config;
pub mod constants;
mod logging;
mod models;
mod peek;
mod shell;
mod ui;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use config::Config;
use constants::MIN_POLL_INTERVAL_MS;

/// webshell - terminal client for the web shell backend
#[derive(Parser, Debug)]
#[command(name = "webshell", version, about = "Shell panes and a live process view over HTTP")]
struct Cli {
    /// Backend base URL (e.g. "http://127.0.0.1:5000")
    #[arg(long, short = 's', value_name = "URL")]
    server: Option<String>,

    /// Color theme (default, gruvbox, nord, dracula, or a custom theme file name)
    #[arg(long, short = 't')]
    theme: Option<String>,

    /// Process list refresh interval in milliseconds
    #[arg(long, short = 'p', value_name = "MS")]
    poll_interval: Option<u64>,

    /// Write logs to this file instead of the default location
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and apply CLI overrides to config
    let mut config = Config::load();
    if let Some(ref url) = cli.server {
        config.set_server_url(url);
    }
    if let Some(ref theme_name) = cli.theme {
        config.theme = theme_name.clone();
    }
    if let Some(ms) = cli.poll_interval {
        config.poll_interval_ms = ms.max(MIN_POLL_INTERVAL_MS);
    }
    if let Some(path) = cli.log_file {
        config.log_file = path;
    }

    if !logging::init(&config.log_file, &config.log_level) {
        eprintln!(
            "Warning: could not open log file {}; logging disabled.",
            config.log_file.display()
        );
    }
    if let Some(ref warning) = config.load_warning {
        tracing::warn!("{}", warning);
    }
    tracing::debug!(?config, "configuration loaded");

    let mut app = app::App::new(&config);
    app.run().await
}
