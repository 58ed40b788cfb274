use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

pub mod admin;
pub mod contact;
pub mod health;

/// Largest JSON body accepted on any route.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Full HTTP surface: contact form, admin listing, health check.
pub fn router(state: AppState, client_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/contact", post(contact::create_contact_handler))
        .route("/api/admin/requests", get(admin::list_requests_handler))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer(client_origins))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(client_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = client_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CLIENT_ORIGIN entry: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(admin::ADMIN_TOKEN_HEADER),
        ])
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
