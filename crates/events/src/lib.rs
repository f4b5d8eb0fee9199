//! `taskdesk-events`: authentication lifecycle events and callback fan-out.
//!
//! Payload-agnostic: the auth crate plugs its own payload type into
//! [`AuthEvent`].

pub mod event;
pub mod registry;

pub use event::{AuthEvent, EventType};
pub use registry::{CallbackRegistry, EventCallback, RegistryError};
