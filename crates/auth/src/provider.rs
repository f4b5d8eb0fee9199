use std::sync::Arc;

use serde::{Deserialize, Serialize};
use url::Url;

use taskdesk_core::CallbackId;

use crate::account::{IdentityEvent, SessionAccount};

/// Callback invoked for every event the provider emits.
pub type EventHandler = Arc<dyn Fn(&IdentityEvent) + Send + Sync>;

/// Non-interactive sign-on request against a specific authority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SilentRequest {
    pub authority: Url,
    /// Account hint. `None` leaves it to the provider (which may fail or
    /// fall back to interaction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<SessionAccount>,
}

/// The identity session provider seam.
///
/// Owns accounts, tokens, in-flight operations and event emission. The rest
/// of the shell only ever reads accounts and *asks* for operations; all
/// session mutation happens behind this trait.
///
/// ## Callback contract
///
/// Handlers run synchronously on the emitting thread, one event at a time, in
/// emission order. A handler may call back into the provider.
pub trait IdentitySessionProvider: Send + Sync {
    /// Register `handler`. `None` means the provider could not register it
    /// (and will never call it).
    fn add_event_callback(&self, handler: EventHandler) -> Option<CallbackId>;

    fn remove_event_callback(&self, id: CallbackId);

    /// Snapshot of every signed-in account.
    fn get_all_accounts(&self) -> Vec<SessionAccount>;

    /// Start a silent sign-on. Fire-and-forget: completion is reported later
    /// through `SsoSilentSuccess` / `SsoSilentFailure` events.
    fn sso_silent(&self, request: SilentRequest);
}

impl<P> IdentitySessionProvider for Arc<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    fn add_event_callback(&self, handler: EventHandler) -> Option<CallbackId> {
        (**self).add_event_callback(handler)
    }

    fn remove_event_callback(&self, id: CallbackId) {
        (**self).remove_event_callback(id)
    }

    fn get_all_accounts(&self) -> Vec<SessionAccount> {
        (**self).get_all_accounts()
    }

    fn sso_silent(&self, request: SilentRequest) {
        (**self).sso_silent(request)
    }
}
