//! Daemon settings
//!
//! Layered with the `config` crate (highest priority first):
//! 1. Environment variables `MILKWATCH__<SECTION>__<KEY>` (e.g. `MILKWATCH__SMTP__PASSWORD`)
//! 2. TOML file (`MILKWATCH_CONFIG`, default `~/.milkwatch/config.toml`)
//! 3. Compiled defaults
//!
//! ```toml
//! [feed]
//! url = "https://www.rememberthemilk.com/atom/fleet/..."
//!
//! [notify]
//! from = "tasks@example.com"
//! oversight = "steve@example.com"
//!
//! [[recipients]]
//! tag = "Work"
//! name = "Alice"
//! email = "alice@example.com"
//! ```
//!
//! Recipient rules are an array rather than a table keyed by tag because
//! `config` lower-cases keys, and tags are matched case-sensitively.

use anyhow::{bail, Context, Result};
use milkwatch_core::application::watcher::constants::DEFAULT_POLL_INTERVAL;
use milkwatch_core::application::{NotifierConfig, WatcherConfig};
use milkwatch_core::domain::recipient::validate_address;
use milkwatch_core::domain::{Recipient, RecipientRules};
use milkwatch_infra_smtp::smtp_mailer::{DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT};
use milkwatch_infra_smtp::SmtpConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "~/.milkwatch/config.toml";
pub const DEFAULT_CACHE_PATH: &str = "feed.xml";
const DEFAULT_TIMEOUT_SECS: i64 = 30;
const ENV_PREFIX: &str = "MILKWATCH";

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSettings {
    pub url: String,
    pub cache_path: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifySettings {
    pub from: String,
    pub oversight: String,
    pub interval_secs: u64,
}

/// One `[[recipients]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct RecipientRule {
    pub tag: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Deserialize)]
pub struct Settings {
    pub feed: FeedSettings,
    pub smtp: SmtpSettings,
    pub notify: NotifySettings,
    #[serde(default)]
    pub recipients: Vec<RecipientRule>,
}

/// Config file location: `MILKWATCH_CONFIG` if set (must exist), else the default (optional)
pub fn resolve_config_path() -> (PathBuf, bool) {
    match std::env::var("MILKWATCH_CONFIG") {
        Ok(path) => (PathBuf::from(shellexpand::tilde(&path).into_owned()), true),
        Err(_) => (
            PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).into_owned()),
            false,
        ),
    }
}

impl Settings {
    /// Load and validate settings
    ///
    /// # Errors
    /// Fails if a required file is missing, a value has the wrong type,
    /// a required key is absent, or validation fails.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .set_default("feed.cache_path", DEFAULT_CACHE_PATH)?
            .set_default("feed.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("smtp.host", DEFAULT_SMTP_HOST)?
            .set_default("smtp.port", i64::from(DEFAULT_SMTP_PORT))?
            .set_default("smtp.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("notify.interval_secs", DEFAULT_POLL_INTERVAL.as_secs() as i64)?
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("loading configuration from {}", path.display()))?
            .try_deserialize()
            .context("invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.url.trim().is_empty() {
            bail!("feed.url must not be empty");
        }
        if self.notify.interval_secs == 0 {
            bail!("notify.interval_secs must be greater than zero");
        }
        validate_address(&self.notify.from).context("notify.from")?;
        validate_address(&self.notify.oversight).context("notify.oversight")?;
        self.recipient_rules()
            .validate()
            .context("recipients")?;
        Ok(())
    }

    /// Tag -> recipient table (a later rule for the same tag wins)
    pub fn recipient_rules(&self) -> RecipientRules {
        self.recipients
            .iter()
            .map(|r| (r.tag.clone(), Recipient::new(r.name.clone(), r.email.clone())))
            .collect()
    }

    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.feed.cache_path).into_owned())
    }

    pub fn feed_timeout(&self) -> Duration {
        Duration::from_secs(self.feed.timeout_secs)
    }

    pub fn smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.smtp.host.clone(),
            port: self.smtp.port,
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            timeout: Duration::from_secs(self.smtp.timeout_secs),
        }
    }

    pub fn notifier_config(&self) -> NotifierConfig {
        NotifierConfig {
            from: self.notify.from.clone(),
            oversight: self.notify.oversight.clone(),
        }
    }

    pub fn watcher_config(&self) -> WatcherConfig {
        WatcherConfig {
            interval: Duration::from_secs(self.notify.interval_secs),
            rules: self.recipient_rules(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"
[feed]
url = "https://feeds.example.com/atom/tasks"

[smtp]
username = "bot"
password = "secret"

[notify]
from = "tasks@example.com"
oversight = "steve@example.com"

[[recipients]]
tag = "Work"
name = "Alice"
email = "alice@example.com"

[[recipients]]
tag = "Drivers"
name = "Drivers"
email = "drivers@example.com"
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_applies_defaults() {
        let file = write_config(CONFIG);
        let settings = Settings::load(file.path(), true).unwrap();

        assert_eq!(settings.feed.cache_path, DEFAULT_CACHE_PATH);
        assert_eq!(settings.smtp.host, DEFAULT_SMTP_HOST);
        assert_eq!(settings.smtp.port, DEFAULT_SMTP_PORT);
        assert_eq!(settings.watcher_config().interval, Duration::from_secs(600));
    }

    #[test]
    fn test_recipient_tags_keep_case() {
        let file = write_config(CONFIG);
        let rules = Settings::load(file.path(), true).unwrap().recipient_rules();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules.get("Work").map(|r| r.name.as_str()), Some("Alice"));
        assert!(rules.get("work").is_none());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(&dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn test_invalid_recipient_address_fails() {
        let file = write_config(&CONFIG.replace("alice@example.com", "alice"));
        let err = match Settings::load(file.path(), true) {
            Err(e) => e,
            Ok(_) => panic!("expected error"),
        };
        assert!(format!("{:#}", err).contains("recipients"));
    }

    #[test]
    fn test_zero_interval_fails() {
        let file = write_config(&CONFIG.replace(
            "[notify]\n",
            "[notify]\ninterval_secs = 0\n",
        ));
        assert!(Settings::load(file.path(), true).is_err());
    }
}
