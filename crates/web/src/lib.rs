//! Web shell: page routing, layout chrome and the dev event endpoints.

pub mod app;
pub mod config;

pub use config::{WebConfig, WebConfigError};
