// Mail submission port
use crate::domain::MailMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Mailer trait
///
/// Implementations:
/// - SmtpMailer: authenticated STARTTLS submission
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a composed message to all of its recipients
    async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mailer that records every message instead of sending it
    #[derive(Default)]
    pub struct RecordingMailer {
        sent: Arc<Mutex<Vec<MailMessage>>>,
        failure: Arc<Mutex<Option<String>>>,
    }

    impl RecordingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn new_failing(message: impl Into<String>) -> Self {
            let mailer = Self::new();
            *mailer.failure.lock().unwrap() = Some(message.into());
            mailer
        }

        pub fn sent(&self) -> Vec<MailMessage> {
            self.sent.lock().unwrap().clone()
        }

        pub fn sent_count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &MailMessage) -> Result<(), DeliveryError> {
            if let Some(reason) = self.failure.lock().unwrap().clone() {
                return Err(DeliveryError::Transport(reason));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }
}
