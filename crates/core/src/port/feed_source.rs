// Remote feed source port
use crate::error::Result;
use async_trait::async_trait;

/// Remote feed source (simple GET of the configured feed URL)
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Download the raw feed body
    ///
    /// # Errors
    /// - AppError::Feed on network failure or non-success status
    async fn download(&self) -> Result<Vec<u8>>;

    /// Human-readable location, for logs
    fn location(&self) -> &str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Mock feed source serving a settable body (or a failure)
    pub struct MockFeedSource {
        body: Arc<Mutex<std::result::Result<Vec<u8>, String>>>,
        call_count: Arc<Mutex<usize>>,
    }

    impl MockFeedSource {
        pub fn new(body: impl Into<Vec<u8>>) -> Self {
            Self {
                body: Arc::new(Mutex::new(Ok(body.into()))),
                call_count: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_failing(message: impl Into<String>) -> Self {
            let source = Self::new(Vec::new());
            source.set_failure(message);
            source
        }

        pub fn set_body(&self, body: impl Into<Vec<u8>>) {
            *self.body.lock().unwrap() = Ok(body.into());
        }

        pub fn set_failure(&self, message: impl Into<String>) {
            *self.body.lock().unwrap() = Err(message.into());
        }

        pub fn call_count(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl FeedSource for MockFeedSource {
        async fn download(&self) -> Result<Vec<u8>> {
            *self.call_count.lock().unwrap() += 1;
            self.body.lock().unwrap().clone().map_err(AppError::Feed)
        }

        fn location(&self) -> &str {
            "mock://feed"
        }
    }
}
