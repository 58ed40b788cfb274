use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};
use uuid::Uuid;

use super::{MailError, Mailer, OutgoingMail};
use crate::config::SmtpConfig;

/// Mailer backed by a remote SMTP relay.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig, from: &str) -> Result<Self, MailError> {
        let from: Mailbox = from
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{from}: {e}")))?;

        // secure -> implicit TLS, otherwise upgrade with STARTTLS
        let builder = if cfg.secure {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
        }
        .map_err(|e| MailError::Smtp(e.to_string()))?;

        let mut builder = builder.port(cfg.port);
        if let Some(user) = &cfg.user {
            builder = builder.credentials(Credentials::new(
                user.clone(),
                cfg.password.clone().unwrap_or_default(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, mail: &OutgoingMail, message_id: &str) -> Result<Message, MailError> {
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::InvalidAddress(format!("{}: {e}", mail.to)))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .message_id(Some(message_id.to_string()));

        let message = match (mail.text_body(), mail.html.clone()) {
            (Some(text), Some(html)) => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))
            }
            (Some(text), None) => builder.header(ContentType::TEXT_PLAIN).body(text),
            (None, Some(html)) => builder.header(ContentType::TEXT_HTML).body(html),
            (None, None) => builder.header(ContentType::TEXT_PLAIN).body(" ".to_string()),
        };

        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain());

        let result = match self.build_message(mail, &message_id) {
            Ok(message) => self
                .transport
                .send(message)
                .await
                .map(|_| ())
                .map_err(|e| MailError::Smtp(e.to_string())),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                info!("Email sent: {} -> {}", message_id, mail.to);
                Ok(message_id)
            }
            Err(err) => {
                error!("Email error for {}: {}", mail.to, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: 587,
            secure: false,
            user: Some("team@example.com".into()),
            password: Some("secret".into()),
        }
    }

    #[test]
    fn rejects_bad_sender() {
        assert!(matches!(
            SmtpMailer::new(&smtp_config(), "not an address"),
            Err(MailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn builds_alternative_message() {
        let mailer = SmtpMailer::new(&smtp_config(), "Senevon <team@example.com>").unwrap();
        let mail = OutgoingMail {
            to: "ada@example.com".into(),
            subject: "We received your request".into(),
            text: Some("plain".into()),
            html: Some("<p>rich</p>".into()),
        };

        let message = mailer.build_message(&mail, "<id@example.com>").unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Message-ID: <id@example.com>"));
        assert!(raw.contains("To: ada@example.com"));
    }

    #[tokio::test]
    async fn bad_recipient_is_a_build_time_error() {
        let mailer = SmtpMailer::new(&smtp_config(), "team@example.com").unwrap();
        let mail = OutgoingMail {
            to: "nope".into(),
            subject: "x".into(),
            text: None,
            html: None,
        };

        assert!(matches!(
            mailer.send(&mail).await,
            Err(MailError::InvalidAddress(_))
        ));
    }
}
