//! HTTP application wiring (Axum router + state).
//!
//! - `state.rs`: provider, mounted reconciler and todo store shared by handlers
//! - `layout.rs`: page chrome (nav bar, header, conditional footer)
//! - `routes/`: one file per page / endpoint group
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::WebConfig;

pub mod errors;
pub mod layout;
pub mod routes;
pub mod state;
pub mod todos;

pub use state::AppState;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Mounts the auth event reconciler for the lifetime of the router.
pub fn build_app(config: &WebConfig) -> Router {
    let state = AppState::new(&config.auth);
    build_app_with_state(config, state)
}

/// Like [`build_app`], but with caller-provided state (tests keep a handle
/// on the provider this way).
pub fn build_app_with_state(config: &WebConfig, state: AppState) -> Router {
    let mut app = routes::router().route("/health", get(routes::system::health));

    if config.dev_events {
        app = app.nest("/dev", routes::dev::router());
    }

    app.layer(Extension(state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
