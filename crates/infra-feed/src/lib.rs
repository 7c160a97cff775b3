// Milkwatch Infrastructure - Feed Adapters
// Implements: FeedSource, FeedCache, FeedDecoder

pub mod atom_decoder;
pub mod file_cache;
pub mod http_source;

pub use atom_decoder::AtomFeedDecoder;
pub use file_cache::FileFeedCache;
pub use http_source::HttpFeedSource;
