// HTTP feed source
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use milkwatch_core::error::{AppError, Result};
use milkwatch_core::port::FeedSource;

const USER_AGENT: &str = concat!("milkwatch/", env!("CARGO_PKG_VERSION"));

/// Downloads the feed with a plain GET
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    /// Create a source for `url`
    ///
    /// # Arguments
    /// * `url` - Feed URL
    /// * `timeout` - Whole-request timeout (connect + body)
    ///
    /// # Errors
    /// - AppError::Config if the HTTP client cannot be built
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn download(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Feed(format!("GET {}: {}", self.url, e)))?
            .error_for_status()
            .map_err(|e| AppError::Feed(format!("GET {}: {}", self.url, e)))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::Feed(format!("reading body of {}: {}", self.url, e)))?;

        debug!(url = %self.url, bytes = body.len(), "Downloaded feed");
        Ok(body.to_vec())
    }

    fn location(&self) -> &str {
        &self.url
    }
}
