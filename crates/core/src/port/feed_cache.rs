// Local feed cache port
use crate::error::Result;
use async_trait::async_trait;

/// Local copy of the last-seen feed document (stored verbatim)
#[async_trait]
pub trait FeedCache: Send + Sync {
    /// Read the cached body
    ///
    /// # Returns
    /// None if nothing has been cached yet
    async fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Replace the cached body wholesale
    ///
    /// Implementations must not leave a partially written cache behind
    async fn write(&self, body: &[u8]) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// In-memory feed cache
    #[derive(Default)]
    pub struct InMemoryFeedCache {
        body: Arc<Mutex<Option<Vec<u8>>>>,
        write_count: Arc<Mutex<usize>>,
        fail_writes: Arc<Mutex<bool>>,
    }

    impl InMemoryFeedCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_body(body: impl Into<Vec<u8>>) -> Self {
            let cache = Self::new();
            *cache.body.lock().unwrap() = Some(body.into());
            cache
        }

        pub fn body(&self) -> Option<Vec<u8>> {
            self.body.lock().unwrap().clone()
        }

        pub fn write_count(&self) -> usize {
            *self.write_count.lock().unwrap()
        }

        pub fn set_fail_writes(&self, fail: bool) {
            *self.fail_writes.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl FeedCache for InMemoryFeedCache {
        async fn read(&self) -> Result<Option<Vec<u8>>> {
            Ok(self.body.lock().unwrap().clone())
        }

        async fn write(&self, body: &[u8]) -> Result<()> {
            if *self.fail_writes.lock().unwrap() {
                return Err(AppError::Cache("write disabled".to_string()));
            }
            *self.write_count.lock().unwrap() += 1;
            *self.body.lock().unwrap() = Some(body.to_vec());
            Ok(())
        }
    }
}
