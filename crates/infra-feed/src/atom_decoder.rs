// Atom/RSS decoder backed by feed-rs
use feed_rs::model::Entry;
use feed_rs::parser;

use milkwatch_core::domain::{FeedDocument, FeedEntry};
use milkwatch_core::port::{DecodeError, FeedDecoder};

/// Decodes Atom, RSS 0.9x/1.0/2.0 and JSON Feed bodies
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomFeedDecoder;

impl AtomFeedDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FeedDecoder for AtomFeedDecoder {
    fn decode(&self, body: &[u8]) -> Result<FeedDocument, DecodeError> {
        let feed = parser::parse(body).map_err(|e| DecodeError(e.to_string()))?;
        Ok(FeedDocument::new(
            feed.entries.into_iter().map(to_entry).collect(),
        ))
    }
}

fn to_entry(entry: Entry) -> FeedEntry {
    let link = select_link(&entry);
    let published = entry.published.or(entry.updated);
    let title = entry.title.map(|t| t.content).unwrap_or_default();

    // Atom <content>, falling back to the RSS description / Atom summary
    let content = entry
        .content
        .and_then(|c| c.body)
        .or_else(|| entry.summary.map(|s| s.content));

    FeedEntry {
        id: entry.id,
        title,
        published,
        link,
        content,
    }
}

fn select_link(entry: &Entry) -> String {
    entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().map_or(true, |rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const FIXTURE: &[u8] = include_bytes!("../tests/fixtures/tasks.atom.xml");

    #[test]
    fn test_decode_atom_fixture() {
        let doc = AtomFeedDecoder::new().decode(FIXTURE).unwrap();

        assert_eq!(doc.len(), 2);
        let first = &doc.entries[0];
        assert_eq!(first.id, "tag:rememberthemilk.com,2024:task:10010001");
        assert_eq!(first.title, "Pick up van");
        assert_eq!(
            first.link,
            "https://www.rememberthemilk.com/home/fleet/#all/10010001"
        );
        assert_eq!(
            first.published,
            Some(Utc.with_ymd_and_hms(2024, 3, 14, 8, 0, 0).unwrap())
        );
        let content = first.content.as_deref().unwrap();
        assert!(content.contains("rtm_tags_value"));
        assert!(content.contains("Work, Urgent"));
    }

    #[test]
    fn test_decode_rss_description_as_content() {
        let rss = br#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>t</title><link>https://x</link><description>d</description>
<item><guid>task-1</guid><title>Wash car</title><link>https://x/1</link>
<description>&lt;span class="rtm_tags_value"&gt;Home&lt;/span&gt;</description></item>
</channel></rss>"#;

        let doc = AtomFeedDecoder::new().decode(rss).unwrap();

        assert_eq!(doc.entries[0].id, "task-1");
        assert_eq!(doc.entries[0].link, "https://x/1");
        assert!(doc.entries[0]
            .content
            .as_deref()
            .unwrap()
            .contains("rtm_tags_value"));
    }

    #[test]
    fn test_decode_malformed_is_error() {
        let decoder = AtomFeedDecoder::new();
        assert!(decoder.decode(b"this is not a feed").is_err());
        assert!(decoder.decode(b"").is_err());
        assert!(decoder.decode(b"<html><body>502 Bad Gateway</body></html>").is_err());
    }
}
