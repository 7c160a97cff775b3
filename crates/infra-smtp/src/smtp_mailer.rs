// SMTP mailer: STARTTLS submission with username/password login
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::fmt;
use std::time::Duration;
use tracing::debug;

use milkwatch_core::domain::MailMessage;
use milkwatch_core::error::{AppError, Result};
use milkwatch_core::port::{DeliveryError, Mailer};

/// Default submission endpoint
pub const DEFAULT_SMTP_HOST: &str = "secure.emailsrvr.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Mail submission settings
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Per-command network timeout
    pub timeout: Duration,
}

// Keeps the password out of logs
impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Mailer submitting over an authenticated STARTTLS session
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Create a mailer for the configured endpoint
    ///
    /// TLS is negotiated with STARTTLS before authenticating. No connection
    /// is made until the first message is sent.
    ///
    /// # Errors
    /// - AppError::Config if the TLS parameters for `host` cannot be built
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AppError::Config(format!("SMTP relay {}: {}", config.host, e)))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(config.timeout))
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: &MailMessage) -> std::result::Result<(), DeliveryError> {
        let email = build_message(message)?;
        let response = self.transport.send(email).await.map_err(classify_error)?;
        debug!(code = %response.code(), "Message accepted by relay");
        Ok(())
    }
}

/// Build a multipart/alternative (plain + html) message
pub fn build_message(message: &MailMessage) -> std::result::Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&message.from)?)
        .to(parse_mailbox(&message.to)?)
        .subject(message.subject.as_str());

    if let Some(cc) = &message.cc {
        builder = builder.cc(parse_mailbox(cc)?);
    }

    builder
        .multipart(MultiPart::alternative_plain_html(
            message.text.clone(),
            message.html.clone(),
        ))
        .map_err(|e| DeliveryError::InvalidMessage(e.to_string()))
}

fn parse_mailbox(address: &str) -> std::result::Result<Mailbox, DeliveryError> {
    address
        .parse()
        .map_err(|e| DeliveryError::InvalidMessage(format!("{}: {}", address, e)))
}

// 530/535 are the relay's authentication rejections
fn classify_error(err: lettre::transport::smtp::Error) -> DeliveryError {
    let code = err.status().map(|c| c.to_string());
    match code.as_deref() {
        Some("530") | Some("534") | Some("535") => DeliveryError::Auth(err.to_string()),
        _ => DeliveryError::Transport(err.to_string()),
    }
}
