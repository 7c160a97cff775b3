// Feed Document Model
// Format-neutral view of an Atom/RSS document, produced by a FeedDecoder

use chrono::{DateTime, Utc};

/// One entry of a decoded feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub published: Option<DateTime<Utc>>,
    pub link: String,
    /// Rendered entry content (HTML), if the entry carried any
    pub content: Option<String>,
}

/// Decoded feed document (entries in document order)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn new(entries: Vec<FeedEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
