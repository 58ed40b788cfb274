use serde_json::Value;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::db::pagination::{Page, PageRequest};
use crate::db::{ContactRequest, DynContactStore, StoreError};
use crate::mail::templates;
use crate::notify::Dispatcher;
use crate::validate::{validate_contact, ValidationErrors};

/// Decoy form field. Humans never see it, so a filled value means a bot.
pub const HONEYPOT_FIELD: &str = "website";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ListError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of an accepted submission.
#[derive(Debug)]
pub struct SubmitOutcome {
    /// Id of the stored record, or a throwaway id for a decoy hit.
    pub id: Uuid,
    /// False when the submission was discarded by the honeypot.
    pub stored: bool,
    /// Mail dispatches still in flight: one for the submitter, one for the
    /// admin inbox when configured, none for a decoy hit. Dropping them
    /// leaves the sends running.
    pub dispatches: Vec<JoinHandle<()>>,
}

pub struct ContactService {
    store: DynContactStore,
    dispatcher: Dispatcher,
    admin_email: Option<String>,
    admin_token: Option<String>,
    brand_name: String,
}

impl ContactService {
    pub fn new(
        store: DynContactStore,
        dispatcher: Dispatcher,
        admin_email: Option<String>,
        admin_token: Option<String>,
        brand_name: String,
    ) -> Self {
        Self {
            store,
            dispatcher,
            admin_email,
            admin_token,
            brand_name,
        }
    }

    /// Validate, store, then notify the submitter and the admin inbox.
    ///
    /// Returns once the record is stored; mail goes out in the background and
    /// its outcome never reaches the caller.
    pub async fn submit(&self, body: &Value) -> Result<SubmitOutcome, SubmitError> {
        if honeypot_filled(body) {
            let id = Uuid::new_v4();
            warn!("Honeypot field filled; discarding submission (decoy id {})", id);
            return Ok(SubmitOutcome {
                id,
                stored: false,
                dispatches: Vec::new(),
            });
        }

        let record = validate_contact(body)?;

        let contact = self.store.create(record).await.map_err(|e| {
            error!("Contact error: failed to store request: {:?}", e);
            e
        })?;
        info!("Stored contact request {}", contact.id);

        let dispatches = self.notify(&contact);

        Ok(SubmitOutcome {
            id: contact.id,
            stored: true,
            dispatches,
        })
    }

    fn notify(&self, contact: &ContactRequest) -> Vec<JoinHandle<()>> {
        let mut dispatches = vec![self.dispatcher.dispatch(
            "client",
            templates::client_confirmation(contact, &self.brand_name),
        )];

        match &self.admin_email {
            Some(admin_to) => dispatches.push(
                self.dispatcher
                    .dispatch("admin", templates::admin_notification(contact, admin_to)),
            ),
            None => warn!("No admin inbox configured; skipping new-lead notification"),
        }

        dispatches
    }

    /// One page of stored requests, newest first, for holders of the admin token.
    pub async fn list(
        &self,
        request: PageRequest,
        credential: Option<&str>,
    ) -> Result<Page<ContactRequest>, ListError> {
        if !self.authorized(credential) {
            return Err(ListError::Unauthorized);
        }

        let (total, items) = tokio::try_join!(
            self.store.count(),
            self.store.list_newest(request.offset(), request.limit),
        )
        .map_err(|e| {
            error!("Admin listing failed: {:?}", e);
            e
        })?;

        Ok(Page::new(request, total, items))
    }

    fn authorized(&self, credential: Option<&str>) -> bool {
        match (self.admin_token.as_deref(), credential) {
            (Some(expected), Some(given)) => tokens_match(expected, given),
            _ => false,
        }
    }
}

/// Filled means non-blank text or `true`; any other value reads as untouched.
fn honeypot_filled(body: &Value) -> bool {
    match body.get(HONEYPOT_FIELD) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Bool(checked)) => *checked,
        _ => false,
    }
}

/// Equality check that looks at every byte, so timing does not reveal the
/// length of the matching prefix.
fn tokens_match(expected: &str, given: &str) -> bool {
    let (a, b) = (expected.as_bytes(), given.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
