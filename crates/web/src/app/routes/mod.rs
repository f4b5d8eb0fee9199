use axum::{Router, routing::get};

pub mod dev;
pub mod home;
pub mod system;
pub mod todolist;

/// Page routes.
pub fn router() -> Router {
    Router::new()
        .route("/", get(home::home))
        .route("/todolist", get(todolist::list).post(todolist::create))
}
