//! Endpoints that drive the in-memory identity provider.
//!
//! Mounted only when `TASKDESK_DEV_EVENTS` is set. They stand in for the
//! identity broker completing flows, so the shell can be exercised end to
//! end without one.

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;

use taskdesk_auth::{IdTokenClaims, IdentitySessionProvider};
use taskdesk_events::EventType;

use crate::app::errors::json_error;
use crate::app::state::AppState;

pub fn router() -> Router {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
        .route("/silent", get(silent_requests))
        .route("/silent/resolve", post(resolve_silent))
}

#[derive(Debug, Deserialize)]
pub struct DevSignIn {
    pub event_type: EventType,
    #[serde(default)]
    pub username: Option<String>,
    pub claims: IdTokenClaims,
}

/// Complete an interactive flow for `claims` and emit `event_type`.
pub async fn sign_in(
    Extension(state): Extension<AppState>,
    Json(req): Json<DevSignIn>,
) -> Response {
    if !matches!(
        req.event_type,
        EventType::LoginSuccess | EventType::AcquireTokenSuccess
    ) {
        return json_error(
            StatusCode::BAD_REQUEST,
            "unsupported_event_type",
            format!("{} does not complete a sign-in", req.event_type),
        );
    }

    let username = req
        .username
        .unwrap_or_else(|| req.claims.name().unwrap_or("user").to_string());
    let account = state
        .provider
        .complete_sign_in(req.event_type, username, req.claims);

    (StatusCode::CREATED, Json(account)).into_response()
}

pub async fn sign_out(Extension(state): Extension<AppState>) -> StatusCode {
    state.provider.sign_out();
    StatusCode::NO_CONTENT
}

pub async fn silent_requests(Extension(state): Extension<AppState>) -> impl IntoResponse {
    Json(json!({
        "requests": state.provider.silent_requests(),
        "pending": state.provider.pending_silent_requests(),
        "accounts": state.provider.get_all_accounts().len(),
    }))
}

pub async fn resolve_silent(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let resolved = state.provider.resolve_silent_requests();
    Json(json!({ "resolved": resolved }))
}
