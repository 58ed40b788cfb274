//! Outbound email.
//!
//! [`Mailer::send`] makes exactly one delivery attempt and hands any failure
//! back to the caller. Deciding whether a failure matters is the caller's job;
//! the contact flow runs sends through [`crate::notify::Dispatcher`], which
//! only logs them.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;

pub mod smtp;
pub mod templates;

pub use smtp::SmtpMailer;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing required config: {0}")]
    MissingConfig(&'static str),

    #[error("invalid email address: {0}")]
    InvalidAddress(String),

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("SMTP error: {0}")]
    Smtp(String),
}

/// A single message to deliver. The sender comes from the mailer's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
}

impl OutgoingMail {
    /// Plain-text body to send. Falls back to a single space when the mail
    /// carries no body at all, since some relays reject empty messages.
    pub fn text_body(&self) -> Option<String> {
        match (&self.text, &self.html) {
            (Some(text), _) => Some(text.clone()),
            (None, Some(_)) => None,
            (None, None) => Some(" ".to_string()),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt one delivery. Returns the message id on success.
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError>;
}

pub type DynMailer = Arc<dyn Mailer>;

/// Mailer used when no SMTP relay is configured: logs and drops every message.
#[derive(Clone, Default)]
pub struct NoopMailer;

impl NoopMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for NoopMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let message_id = format!("<{}@noop.invalid>", Uuid::new_v4());
        info!(
            "SMTP not configured; dropping mail {} -> {} ({})",
            message_id, mail.to, mail.subject
        );
        Ok(message_id)
    }
}

/// Build the mailer from config.
///
/// If `SMTP_HOST` is set -> SMTP relay
/// Otherwise -> Noop mailer (submissions are still stored, no mail goes out)
pub fn build_mailer(cfg: &Config) -> Result<DynMailer, MailError> {
    match &cfg.smtp {
        Some(smtp) => {
            let from = cfg
                .mail_from
                .as_deref()
                .ok_or(MailError::MissingConfig("MAIL_FROM or SMTP_USER"))?;
            info!(
                "Initializing SmtpMailer for host={} port={} secure={}",
                smtp.host, smtp.port, smtp.secure
            );
            Ok(Arc::new(SmtpMailer::new(smtp, from)?) as DynMailer)
        }
        None => {
            warn!("SMTP_HOST not set; using NoopMailer (no email will be sent)");
            Ok(Arc::new(NoopMailer::new()) as DynMailer)
        }
    }
}
