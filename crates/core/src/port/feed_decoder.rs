// Feed decoding port
use crate::domain::FeedDocument;
use thiserror::Error;

/// The body is not a well-formed feed document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DecodeError(pub String);

/// Turns a raw feed body (Atom/RSS) into a FeedDocument
pub trait FeedDecoder: Send + Sync {
    fn decode(&self, body: &[u8]) -> Result<FeedDocument, DecodeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;

    /// Decoder that maps known bodies to prepared documents; anything else is malformed
    #[derive(Default)]
    pub struct MapFeedDecoder {
        documents: HashMap<Vec<u8>, FeedDocument>,
    }

    impl MapFeedDecoder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, body: impl Into<Vec<u8>>, document: FeedDocument) -> Self {
            self.documents.insert(body.into(), document);
            self
        }
    }

    impl FeedDecoder for MapFeedDecoder {
        fn decode(&self, body: &[u8]) -> Result<FeedDocument, DecodeError> {
            self.documents
                .get(body)
                .cloned()
                .ok_or_else(|| DecodeError(format!("unknown body ({} bytes)", body.len())))
        }
    }
}
