// Port Layer - Interfaces for external dependencies

pub mod feed_cache;
pub mod feed_decoder;
pub mod feed_source;
pub mod mailer;

// Re-exports
pub use feed_cache::FeedCache;
pub use feed_decoder::{DecodeError, FeedDecoder};
pub use feed_source::FeedSource;
pub use mailer::{DeliveryError, Mailer};
