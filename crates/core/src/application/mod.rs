// Application Layer - Use Cases and Business Logic

pub mod diff;
pub mod fetcher;
pub mod formatter;
pub mod notifier;
pub mod parser;
pub mod watcher;

// Re-exports
pub use fetcher::{FeedFetcher, LiveFeed};
pub use formatter::Notification;
pub use notifier::{Notifier, NotifierConfig};
pub use watcher::{shutdown_channel, CycleReport, FeedWatcher, ShutdownSender, ShutdownToken, WatcherConfig};
