use axum::http::StatusCode;
use axum::response::IntoResponse;
use html_escape::encode_text;
use serde_json::json;

use taskdesk_core::CoreError;

use super::layout::render_page;
use super::state::SessionView;

/// Error rendered inside the normal page chrome.
pub fn page_error(
    status: StatusCode,
    session: &SessionView,
    message: impl AsRef<str>,
) -> axum::response::Response {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        "<section class=\"error\"><h1>{}</h1><p>{}</p></section>",
        encode_text(title),
        encode_text(message.as_ref()),
    );
    (status, render_page(title, session, &body)).into_response()
}

pub fn core_error_to_page(err: CoreError, session: &SessionView) -> axum::response::Response {
    match err {
        CoreError::Validation(msg) => page_error(StatusCode::BAD_REQUEST, session, msg),
        CoreError::InvalidId(msg) => page_error(StatusCode::BAD_REQUEST, session, msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
