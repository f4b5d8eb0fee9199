use std::sync::Arc;

use taskdesk_core::CallbackId;

use crate::provider::{EventHandler, IdentitySessionProvider};

/// A registered event callback, released when dropped.
///
/// Dropping the guard deregisters the callback exactly once, whatever the
/// exit path (scope end, early return, unwinding). If the provider declined
/// the registration the guard is inactive and its drop does nothing.
///
/// Dropping does not cancel work the callback already started (e.g. a
/// queued silent request).
#[must_use = "dropping the subscription immediately deregisters the callback"]
pub struct EventSubscription<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    provider: Arc<P>,
    id: Option<CallbackId>,
}

impl<P> EventSubscription<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    pub fn acquire(provider: Arc<P>, handler: EventHandler) -> Self {
        let id = provider.add_event_callback(handler);
        match id {
            Some(id) => tracing::debug!(callback_id = %id, "subscribed to identity events"),
            None => tracing::warn!("identity provider returned no callback handle"),
        }
        Self { provider, id }
    }

    pub fn id(&self) -> Option<CallbackId> {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }
}

impl<P> Drop for EventSubscription<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.provider.remove_event_callback(id);
            tracing::debug!(callback_id = %id, "unsubscribed from identity events");
        }
    }
}

impl<P> core::fmt::Debug for EventSubscription<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventSubscription").field("id", &self.id).finish()
    }
}
