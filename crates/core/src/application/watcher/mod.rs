// Watcher - Periodic fetch / diff / notify loop

pub mod constants;
mod shutdown;

pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::application::diff::diff;
use crate::application::fetcher::FeedFetcher;
use crate::application::notifier::Notifier;
use crate::application::parser::parse_snapshot;
use crate::domain::RecipientRules;
use crate::error::Result;
use constants::DEFAULT_POLL_INTERVAL;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// Loop configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay between the end of one cycle and the start of the next
    pub interval: Duration,

    /// Tag -> recipient routing
    pub rules: RecipientRules,
}

impl WatcherConfig {
    pub fn new(rules: RecipientRules) -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            rules,
        }
    }
}

/// Outcome of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Tasks in the live feed that were not in the cached feed
    pub new_tasks: usize,
    /// Notifications handed to the mailer
    pub deliveries: usize,
}

/// Watches the feed and notifies recipients about new tasks
pub struct FeedWatcher {
    fetcher: FeedFetcher,
    notifier: Notifier,
    config: WatcherConfig,
}

impl FeedWatcher {
    pub fn new(fetcher: FeedFetcher, notifier: Notifier, config: WatcherConfig) -> Self {
        Self {
            fetcher,
            notifier,
            config,
        }
    }

    /// Run cycles until shutdown
    ///
    /// Each cycle runs to completion before the next delay starts, so cycles
    /// never overlap. A failed cycle is logged and the loop carries on.
    pub async fn run(&self, mut shutdown: ShutdownToken) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            rules = self.config.rules.len(),
            "Feed watcher started"
        );

        loop {
            if shutdown.is_shutdown() {
                break;
            }

            match self.run_cycle().await {
                Ok(report) => {
                    if report.new_tasks > 0 {
                        info!(
                            new_tasks = report.new_tasks,
                            deliveries = report.deliveries,
                            "Cycle completed"
                        );
                    } else {
                        debug!("Cycle completed, no new tasks");
                    }
                }
                Err(e) => {
                    error!(error = %e, "Cycle failed");
                }
            }

            tokio::select! {
                _ = sleep(self.config.interval) => {},
                _ = shutdown.wait() => {
                    info!("Feed watcher interrupted while waiting");
                    break;
                }
            }
        }

        info!("Feed watcher stopped");
    }

    /// Run a single fetch / diff / notify cycle
    ///
    /// The cache is refreshed with the live feed only when new tasks were found
    /// and every notification went out.
    ///
    /// # Errors
    /// - Feed / decode / cache errors from the fetcher
    /// - AppError::Delivery from the first failed notification (cache left as is)
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let local = self.fetcher.load_local().await?;
        let live = self.fetcher.fetch_live().await?;

        let old = parse_snapshot(&local);
        let new = parse_snapshot(&live.document);
        let added = diff(&new, &old);

        let mut report = CycleReport {
            new_tasks: added.len(),
            deliveries: 0,
        };

        for task in &added {
            for tag in task.tags() {
                match self.config.rules.get(tag) {
                    Some(recipient) => {
                        self.notifier.deliver(task, recipient).await?;
                        report.deliveries += 1;
                    }
                    None => debug!(task_id = %task.id, tag = %tag, "No recipient for tag"),
                }
            }
        }

        if !added.is_empty() {
            self.fetcher.store(&live).await?;
        }

        Ok(report)
    }
}
