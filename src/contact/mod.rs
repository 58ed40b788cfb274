pub mod service;

pub use service::{ContactService, ListError, SubmitError, SubmitOutcome, HONEYPOT_FIELD};
