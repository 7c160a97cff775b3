// Domain Layer - Pure business logic and entities

pub mod error;
pub mod feed;
pub mod mail;
pub mod recipient;
pub mod task;

// Re-exports
pub use error::DomainError;
pub use feed::{FeedDocument, FeedEntry};
pub use mail::MailMessage;
pub use recipient::{Recipient, RecipientRules};
pub use task::{Priority, Snapshot, Task, TaskId};
