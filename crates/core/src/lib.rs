//! `taskdesk-core`: shared building blocks.
//!
//! Identifiers and the error model used by every other crate. No IO here.

pub mod error;
pub mod id;

pub use error::{CoreError, CoreResult};
pub use id::{CallbackId, ObjectId, SubjectId, TodoId};
