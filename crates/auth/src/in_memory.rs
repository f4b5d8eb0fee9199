//! In-memory identity session provider for tests/dev.
//!
//! - No IO / no tokens
//! - Accounts live in a `Vec`, keyed by `home_account_id`
//! - Silent requests are queued and only complete when
//!   [`InMemoryIdentityProvider::resolve_silent_requests`] is called, so
//!   callers can observe the window between request and outcome

use std::sync::{Arc, Mutex, PoisonError};

use taskdesk_core::CallbackId;
use taskdesk_events::{CallbackRegistry, EventType};

use crate::account::{AuthResultPayload, IdentityEvent, SessionAccount};
use crate::claims::IdTokenClaims;
use crate::provider::{EventHandler, IdentitySessionProvider, SilentRequest};

/// Error code reported when a silent request carries no account hint.
pub const LOGIN_REQUIRED: &str = "login_required";

#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    callbacks: CallbackRegistry<IdentityEvent>,
    accounts: Mutex<Vec<SessionAccount>>,
    pending_silent: Mutex<Vec<SilentRequest>>,
    issued_silent: Mutex<Vec<SilentRequest>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Deliver `event` to every registered callback. Returns how many ran.
    pub fn emit(&self, event: &IdentityEvent) -> usize {
        match self.callbacks.dispatch(event) {
            Ok(delivered) => {
                tracing::debug!(event_type = %event.kind(), delivered, "identity event emitted");
                delivered
            }
            Err(e) => {
                tracing::error!(event_type = %event.kind(), error = %e, "identity event dropped");
                0
            }
        }
    }

    /// Cache an account, replacing any with the same `home_account_id`.
    pub fn add_account(&self, account: SessionAccount) {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        match accounts
            .iter_mut()
            .find(|existing| existing.home_account_id == account.home_account_id)
        {
            Some(existing) => *existing = account,
            None => accounts.push(account),
        }
    }

    /// Complete an interactive flow: cache the account, then emit
    /// `event_type` carrying it.
    pub fn complete_sign_in(
        &self,
        event_type: EventType,
        username: impl Into<String>,
        claims: IdTokenClaims,
    ) -> SessionAccount {
        let account = SessionAccount::new(username, claims);
        self.add_account(account.clone());
        self.emit(&IdentityEvent::new(
            event_type,
            Some(AuthResultPayload::for_account(account.clone())),
        ));
        account
    }

    /// Clear every cached account and emit `LogoutSuccess`.
    pub fn sign_out(&self) {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.emit(&IdentityEvent::new(EventType::LogoutSuccess, None));
    }

    /// Complete every queued silent request.
    ///
    /// A request with an account succeeds: the account is re-cached and
    /// `SsoSilentSuccess` is emitted with it. One without fails with
    /// [`LOGIN_REQUIRED`]. Returns how many requests were resolved.
    pub fn resolve_silent_requests(&self) -> usize {
        let pending: Vec<SilentRequest> = std::mem::take(
            &mut *self
                .pending_silent
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );

        for request in &pending {
            match &request.account {
                Some(account) => {
                    self.add_account(account.clone());
                    self.emit(&IdentityEvent::new(
                        EventType::SsoSilentSuccess,
                        Some(AuthResultPayload::for_account(account.clone())),
                    ));
                }
                None => {
                    self.emit(&IdentityEvent::failure(EventType::SsoSilentFailure, LOGIN_REQUIRED));
                }
            }
        }

        pending.len()
    }

    /// Every silent request ever issued, oldest first.
    pub fn silent_requests(&self) -> Vec<SilentRequest> {
        self.issued_silent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn pending_silent_requests(&self) -> usize {
        self.pending_silent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl IdentitySessionProvider for InMemoryIdentityProvider {
    fn add_event_callback(&self, handler: EventHandler) -> Option<CallbackId> {
        match self.callbacks.register(handler) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(error = %e, "could not register identity event callback");
                None
            }
        }
    }

    fn remove_event_callback(&self, id: CallbackId) {
        if let Err(e) = self.callbacks.remove(id) {
            tracing::error!(callback_id = %id, error = %e, "could not remove identity event callback");
        }
    }

    fn get_all_accounts(&self) -> Vec<SessionAccount> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn sso_silent(&self, request: SilentRequest) {
        tracing::debug!(authority = %request.authority, with_account = request.account.is_some(), "silent request queued");
        self.issued_silent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.pending_silent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        self.emit(&IdentityEvent::new(EventType::SsoSilentStart, None));
    }
}
