// Watcher constants (no magic values)
use std::time::Duration;

/// Default delay between the end of one cycle and the start of the next (10 minutes)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(600);
