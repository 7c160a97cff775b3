//! Milkwatch - Main Entry Point
//! Polls the task feed and emails subscribers about newly added tasks

mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use milkwatch_core::application::{shutdown_channel, FeedFetcher, FeedWatcher, Notifier};
use milkwatch_infra_feed::{AtomFeedDecoder, FileFeedCache, HttpFeedSource};
use milkwatch_infra_smtp::SmtpMailer;
use settings::{resolve_config_path, Settings};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How long an in-flight cycle may take to finish after ctrl-c
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let _log_guard = init_logging()?;

    debug!("Milkwatch v{} starting...", VERSION);

    // 2. Load configuration
    let (config_path, required) = resolve_config_path();
    debug!(config = %config_path.display(), "Loading configuration...");
    let settings = Settings::load(&config_path, required)?;

    // 3. Setup dependencies (DI wiring)
    let source = Arc::new(
        HttpFeedSource::new(settings.feed.url.clone(), settings.feed_timeout())
            .context("building feed client")?,
    );
    let cache = Arc::new(FileFeedCache::new(settings.cache_path()));
    let decoder = Arc::new(AtomFeedDecoder::new());
    let mailer = Arc::new(SmtpMailer::new(&settings.smtp_config()).context("building mailer")?);

    let watcher = FeedWatcher::new(
        FeedFetcher::new(source, cache, decoder),
        Notifier::new(mailer, settings.notifier_config()),
        settings.watcher_config(),
    );

    info!(
        cache = %settings.cache_path().display(),
        smtp_host = %settings.smtp.host,
        recipients = settings.recipients.len(),
        "Now monitoring live feed."
    );

    // 4. Start the watcher loop
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let watcher_handle = tokio::spawn(async move {
        watcher.run(shutdown_rx).await;
    });

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown
    shutdown_tx.shutdown();
    if tokio::time::timeout(SHUTDOWN_GRACE, watcher_handle)
        .await
        .is_err()
    {
        tracing::warn!("Watcher did not stop in time, abandoning current cycle");
    }

    info!("Shutdown complete.");
    Ok(())
}

/// Console logging (pretty or JSON via `MILKWATCH_LOG_FORMAT`), plus a daily
/// rotated file under `MILKWATCH_LOG_DIR` when set
fn init_logging() -> Result<Option<WorkerGuard>> {
    let log_format = std::env::var("MILKWATCH_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("milkwatch=info"))
        .context("Failed to create env filter")?;

    let (file_layer, guard) = match std::env::var("MILKWATCH_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "milkwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_ansi(false).with_writer(writer)),
                Some(guard),
            )
        }
        Err(_) => (None, None),
    };

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    match log_format.as_str() {
        // Production: JSON structured logging
        "json" => registry.with(fmt::layer().json()).init(),
        // Development: Pretty formatting with colors
        _ => registry.with(fmt::layer().pretty()).init(),
    }

    Ok(guard)
}
