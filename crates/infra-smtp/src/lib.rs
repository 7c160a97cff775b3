// Milkwatch Infrastructure - Mail Submission
// Implements: Mailer

pub mod smtp_mailer;

pub use smtp_mailer::{SmtpConfig, SmtpMailer};
