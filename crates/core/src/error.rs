// Central Error Type for the Application

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    /// Remote feed could not be retrieved (network, HTTP status)
    #[error("Feed fetch error: {0}")]
    Feed(String),

    /// Feed body is not a well-formed feed document
    #[error("Feed decode error: {0}")]
    Decode(#[from] crate::port::DecodeError),

    /// Local feed cache could not be read or replaced
    #[error("Feed cache error: {0}")]
    Cache(String),

    #[error("Delivery error: {0}")]
    Delivery(#[from] crate::port::DeliveryError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
