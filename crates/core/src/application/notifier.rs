// Notifier - Composes and delivers one task notification to one recipient

use crate::application::formatter;
use crate::domain::{MailMessage, Recipient, Task};
use crate::error::Result;
use crate::port::Mailer;
use std::sync::Arc;
use tracing::info;

/// Subject line used for every notification
pub const NOTIFICATION_SUBJECT: &str = "You have a new task.";

/// Sender and oversight addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    /// From address of every notification
    pub from: String,

    /// Address copied on notifications (skipped for itself and the group recipient)
    pub oversight: String,
}

/// Builds notification messages and hands them to a Mailer
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    config: NotifierConfig,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, config: NotifierConfig) -> Self {
        Self { mailer, config }
    }

    /// Compose the message for a task and recipient
    ///
    /// The oversight address is copied unless the recipient already is that
    /// address or is the reserved group recipient.
    pub fn compose(&self, task: &Task, recipient: &Recipient) -> MailMessage {
        let cc = if recipient.email != self.config.oversight && !recipient.is_group() {
            Some(self.config.oversight.clone())
        } else {
            None
        };

        let body = formatter::format(task, recipient);
        MailMessage {
            from: self.config.from.clone(),
            to: recipient.email.clone(),
            cc,
            subject: NOTIFICATION_SUBJECT.to_string(),
            text: body.text,
            html: body.html,
        }
    }

    /// Compose and send the notification
    ///
    /// # Errors
    /// - AppError::Delivery if the mailer rejects the message (not retried)
    pub async fn deliver(&self, task: &Task, recipient: &Recipient) -> Result<()> {
        let message = self.compose(task, recipient);
        self.mailer.send(&message).await?;

        info!(
            task_id = %task.id,
            "Sending E-mails to {} for job {}.",
            message.recipients().join(", "),
            task.job_ref()
        );
        Ok(())
    }
}
