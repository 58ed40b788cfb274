// src/routes/contact.rs
use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{error::ApiError, AppState};

#[derive(Serialize)]
pub struct ContactCreatedResponse {
    pub ok: bool,
    pub id: Uuid,
}

/// POST /api/contact
///
/// Responds as soon as the request is stored; confirmation and admin mails
/// are still being sent when the 201 goes out.
pub async fn create_contact_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ContactCreatedResponse>), ApiError> {
    // An empty body reads as an empty form.
    let body: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&body).map_err(|_| ApiError::InvalidJson)?
    };

    let outcome = state.contacts.submit(&body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            ok: true,
            id: outcome.id,
        }),
    ))
}
