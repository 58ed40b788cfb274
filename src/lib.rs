pub mod config;
pub mod contact;
pub mod db;
pub mod error;
pub mod mail;
pub mod notify;
pub mod routes;
pub mod validate;

use std::sync::Arc;

use contact::ContactService;

#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<ContactService>,
}

impl AppState {
    pub fn new(contacts: ContactService) -> Self {
        Self {
            contacts: Arc::new(contacts),
        }
    }
}
