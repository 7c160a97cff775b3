// Outgoing Mail Model

/// A fully composed notification email, ready for a Mailer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl MailMessage {
    /// Envelope recipients: the primary address followed by the copy, if any
    pub fn recipients(&self) -> Vec<&str> {
        std::iter::once(self.to.as_str())
            .chain(self.cc.as_deref())
            .collect()
    }
}
