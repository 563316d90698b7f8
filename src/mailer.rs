//! Outbound mail.
//!
//! Only the password reset flow sends mail today. The trait keeps delivery
//! swappable; the default implementation writes the message to the log,
//! which is enough for development and for tests.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("failed to deliver mail: {0}")]
    Delivery(String),
}

pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError>;
}

/// Writes outbound messages to the application log instead of sending them.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        log::info!("mail to {to}: {subject}\n{body}");
        Ok(())
    }
}
