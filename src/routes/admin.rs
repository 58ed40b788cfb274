// src/routes/admin.rs
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use std::collections::HashMap;

use crate::db::pagination::PageRequest;
use crate::db::ContactRequest;
use crate::{error::ApiError, AppState};

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Serialize)]
pub struct ListRequestsResponse {
    pub ok: bool,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub items: Vec<ContactRequest>,
}

/// GET /api/admin/requests?page=&limit=
pub async fn list_requests_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    // Raw strings, so malformed values fall back to defaults instead of
    // rejecting the request before the token is checked.
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<ListRequestsResponse>, ApiError> {
    let credential = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    let request = PageRequest::from_query(
        query.get("page").map(String::as_str),
        query.get("limit").map(String::as_str),
    );

    let page = state.contacts.list(request, credential).await?;

    Ok(Json(ListRequestsResponse {
        ok: true,
        total: page.total,
        page: page.page,
        limit: page.limit,
        items: page.items,
    }))
}
