use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use newsdeck::app::{App, AppEvent};
use newsdeck::config::{Config, API_KEY_ENV};
use newsdeck::feed::FeedStore;
use newsdeck::news::NewsApiClient;
use newsdeck::opener::SystemOpener;
use newsdeck::ui;

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Terminal headline reader for NewsAPI")]
struct Args {
    /// Config file (default: ~/.config/newsdeck/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// NewsAPI source id, e.g. "bbc-news"
    #[arg(long, value_name = "ID")]
    source: Option<String>,

    /// API root, e.g. "https://newsapi.org/v2"
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so logs go to a file when one is configured.
/// Otherwise stderr is used only when `RUST_LOG` is set.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("newsdeck=info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if std::env::var_os("RUST_LOG").is_some() => {
            tracing_subscriber::fmt()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        None => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::default(),
    };

    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(log_file) = args.log_file {
        config.log_file = Some(log_file);
    }

    init_tracing(config.log_file.as_deref())?;
    tracing::debug!(?config, "Configuration loaded");

    let api_key = config.api_key(std::env::var(API_KEY_ENV).ok())?;
    let client = NewsApiClient::new(config.news_api(api_key))
        .with_context(|| format!("Invalid base URL '{}'", config.base_url))?;
    let store = FeedStore::new(client);

    let mut app = App::new(Box::new(SystemOpener), config.source.clone());

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, store, event_tx, event_rx).await?;

    Ok(())
}
