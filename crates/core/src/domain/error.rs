// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
