//! Fire-and-forget delivery of outgoing mail.
//!
//! Every dispatch runs on its own tokio task: one attempt, logged on success
//! and on failure, never retried. Dispatches do not wait on each other and the
//! caller never has to wait on them either.

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::mail::{DynMailer, OutgoingMail};

#[derive(Clone)]
pub struct Dispatcher {
    mailer: DynMailer,
}

impl Dispatcher {
    pub fn new(mailer: DynMailer) -> Self {
        Self { mailer }
    }

    /// Start sending `mail` in the background. `label` names the dispatch in
    /// logs. Dropping the returned handle does not cancel the send.
    pub fn dispatch(&self, label: &'static str, mail: OutgoingMail) -> JoinHandle<()> {
        let mailer = self.mailer.clone();

        tokio::spawn(async move {
            match mailer.send(&mail).await {
                Ok(message_id) => {
                    info!("{} mail delivered to relay: {} -> {}", label, message_id, mail.to);
                }
                Err(err) => {
                    warn!("{} mail error: {}", label, err);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::{MailError, Mailer};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FlakyMailer {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<String, MailError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if mail.to.starts_with("bad") {
                Err(MailError::Smtp("relay refused".into()))
            } else {
                Ok("<ok@test>".into())
            }
        }
    }

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to: to.into(),
            subject: "s".into(),
            text: None,
            html: None,
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed_and_not_retried() {
        let mailer = Arc::new(FlakyMailer {
            attempts: AtomicUsize::new(0),
        });
        let dispatcher = Dispatcher::new(mailer.clone());

        let failed = dispatcher.dispatch("client", mail("bad@example.com"));
        let delivered = dispatcher.dispatch("admin", mail("good@example.com"));

        // Neither task panics, regardless of the send outcome.
        failed.await.unwrap();
        delivered.await.unwrap();
        assert_eq!(mailer.attempts.load(Ordering::SeqCst), 2);
    }
}
