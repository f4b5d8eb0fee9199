//! Callback registration and fan-out (mechanics only).
//!
//! This module provides the **callback registry pattern**: consumers register a
//! closure, receive a [`CallbackId`] handle, and later hand the handle back to
//! stop delivery.
//!
//! ## Delivery Guarantees
//!
//! - **Synchronous**: `dispatch()` invokes every callback on the caller's thread
//!   before returning.
//! - **Ordered**: callbacks run in registration order, one message at a time.
//! - **Exactly once per dispatch**: each registered callback sees a dispatched
//!   message once. Dispatching the same message twice delivers it twice.
//! - **No persistence**: a callback registered after a dispatch never sees it.
//!
//! ## Re-entrancy
//!
//! The callback list is snapshotted before invocation and the lock is released,
//! so a callback may register, remove, or trigger further work on the owner of
//! the registry without deadlocking. A callback removed mid-dispatch may still
//! receive the message currently being delivered.

use std::sync::{Arc, Mutex};

use thiserror::Error;

use taskdesk_core::CallbackId;

/// A registered event callback.
pub type EventCallback<M> = Arc<dyn Fn(&M) + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registry lock was poisoned by a panicking callback owner.
    #[error("callback registry lock poisoned")]
    Poisoned,
}

/// In-memory callback registry.
///
/// - No IO / no async
/// - Fan-out to every live callback
pub struct CallbackRegistry<M> {
    callbacks: Mutex<Vec<(CallbackId, EventCallback<M>)>>,
}

impl<M> CallbackRegistry<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback and return its handle.
    pub fn register(&self, callback: EventCallback<M>) -> Result<CallbackId, RegistryError> {
        let mut callbacks = self.callbacks.lock().map_err(|_| RegistryError::Poisoned)?;
        let id = CallbackId::new();
        callbacks.push((id, callback));
        tracing::debug!(callback_id = %id, total = callbacks.len(), "event callback registered");
        Ok(id)
    }

    /// Remove a callback. Returns `false` if the handle was unknown.
    pub fn remove(&self, id: CallbackId) -> Result<bool, RegistryError> {
        let mut callbacks = self.callbacks.lock().map_err(|_| RegistryError::Poisoned)?;
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        let removed = callbacks.len() != before;
        tracing::debug!(callback_id = %id, removed, "event callback removed");
        Ok(removed)
    }

    /// Deliver `message` to every registered callback. Returns how many ran.
    pub fn dispatch(&self, message: &M) -> Result<usize, RegistryError> {
        let snapshot: Vec<EventCallback<M>> = {
            let callbacks = self.callbacks.lock().map_err(|_| RegistryError::Poisoned)?;
            callbacks.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        for callback in &snapshot {
            callback(message);
        }

        Ok(snapshot.len())
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M> Default for CallbackRegistry<M> {
    fn default() -> Self {
        Self {
            callbacks: Mutex::new(Vec::new()),
        }
    }
}

impl<M> core::fmt::Debug for CallbackRegistry<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callbacks", &self.len())
            .finish()
    }
}
