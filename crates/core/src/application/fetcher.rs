// Feed Fetcher - Local cached copy and live remote copy of the feed

use crate::domain::FeedDocument;
use crate::error::Result;
use crate::port::{FeedCache, FeedDecoder, FeedSource};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A freshly downloaded feed: raw body (for the cache) and its decoded form
#[derive(Debug, Clone)]
pub struct LiveFeed {
    pub body: Vec<u8>,
    pub document: FeedDocument,
}

/// Fetches the cached and live feed documents
pub struct FeedFetcher {
    source: Arc<dyn FeedSource>,
    cache: Arc<dyn FeedCache>,
    decoder: Arc<dyn FeedDecoder>,
}

impl FeedFetcher {
    pub fn new(
        source: Arc<dyn FeedSource>,
        cache: Arc<dyn FeedCache>,
        decoder: Arc<dyn FeedDecoder>,
    ) -> Self {
        Self {
            source,
            cache,
            decoder,
        }
    }

    /// Load the cached feed document
    ///
    /// If there is no cached copy, or it does not decode, a fresh copy is
    /// downloaded, decoded and only then written over the cache. A failed
    /// download or an undecodable remote body leaves the cache untouched.
    ///
    /// # Errors
    /// - AppError::Feed / AppError::Decode if the replacement cannot be obtained
    /// - AppError::Cache if the replacement cannot be stored
    pub async fn load_local(&self) -> Result<FeedDocument> {
        match self.cache.read().await? {
            Some(body) => match self.decoder.decode(&body) {
                Ok(document) => {
                    debug!(entries = document.len(), "Loaded cached feed");
                    return Ok(document);
                }
                Err(e) => warn!(error = %e, "Cached feed is malformed, replacing it"),
            },
            None => info!("No cached feed yet, seeding it from the live feed"),
        }

        let live = self.fetch_live().await?;
        self.cache.write(&live.body).await?;
        Ok(live.document)
    }

    /// Download and decode the live feed
    ///
    /// # Errors
    /// - AppError::Feed on network failure
    /// - AppError::Decode if the body is not a feed document
    pub async fn fetch_live(&self) -> Result<LiveFeed> {
        let body = self.source.download().await?;
        let document = self.decoder.decode(&body)?;
        debug!(
            source = self.source.location(),
            bytes = body.len(),
            entries = document.len(),
            "Fetched live feed"
        );
        Ok(LiveFeed { body, document })
    }

    /// Overwrite the cache with a live body
    pub async fn store(&self, live: &LiveFeed) -> Result<()> {
        self.cache.write(&live.body).await?;
        info!(bytes = live.body.len(), "Refreshed cached feed");
        Ok(())
    }
}
