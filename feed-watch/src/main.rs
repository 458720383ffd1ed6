use anyhow::Context;
use clap::Parser;
use feed_watch::config::{email_config_from_env, load_feeds};
use feed_watch::{
    FetchConfig, HttpEmailNotifier, HttpFeedSource, Notifier, RunCoordinator, StateFile,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Check a list of RSS/Atom feeds for entries published since the last run.
#[derive(Debug, Parser)]
#[command(name = "feed-watch", version)]
struct Cli {
    /// Feed list (TOML)
    #[arg(long, env = "FEED_WATCH_FEEDS", default_value = "feeds.toml")]
    feeds: PathBuf,

    /// Watermark state file (JSON)
    #[arg(long, env = "FEED_WATCH_STATE", default_value = "state.json")]
    state: PathBuf,

    /// Where the batch of new entries is written (JSON)
    #[arg(long, env = "FEED_WATCH_OUTPUT", default_value = "new-items.json")]
    output: PathBuf,

    /// Per-feed fetch timeout in seconds
    #[arg(long, env = "FEED_WATCH_TIMEOUT_SECS", default_value_t = 15)]
    timeout_secs: u64,

    /// Send a digest of new entries through the email API
    #[arg(long)]
    notify: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed_watch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Ignoring unreadable .env: {}", e);
        }
    }
    init_tracing();
    let cli = Cli::parse();

    // Configuration problems abort before any feed is touched
    let feeds = load_feeds(&cli.feeds).context("loading feed list")?;
    let notifier = if cli.notify {
        let config = email_config_from_env().context("loading digest settings")?;
        Some(HttpEmailNotifier::new(config))
    } else {
        None
    };

    let fetch_config = FetchConfig {
        timeout_seconds: cli.timeout_secs,
        ..FetchConfig::default()
    };
    let source = HttpFeedSource::new(fetch_config).context("building HTTP client")?;
    let coordinator = RunCoordinator::new(source, Duration::from_secs(cli.timeout_secs));
    let state_file = StateFile::new(&cli.state);

    info!("Checking {} feeds", feeds.len());
    let report = coordinator
        .execute(
            &feeds,
            &state_file,
            &cli.output,
            notifier.as_ref().map(|n| n as &dyn Notifier),
        )
        .await
        .map_err(|e| {
            error!("Run failed: {}", e);
            e
        })
        .context("persisting run results")?;

    let failed = report.failed_feeds();
    if failed > 0 {
        warn!("{} of {} feeds failed this run", failed, feeds.len());
    }
    Ok(())
}
