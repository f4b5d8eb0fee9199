//! Auth event reconciliation.
//!
//! Listens to identity events and keeps the session aligned with the
//! sign-up-or-sign-in policy:
//!
//! - After a successful login / token acquisition issued under the
//!   edit-profile policy, it asks the provider for a silent sign-on under the
//!   sign-up-or-sign-in authority, hinting the account from the original
//!   sign-in. The request is fire-and-forget.
//! - After a successful silent sign-on it records a status marker that the
//!   UI renders.
//!
//! Everything else is ignored. The reconciler never touches accounts itself.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use taskdesk_events::EventType;

use crate::account::IdentityEvent;
use crate::account_match::{AmbiguousAccountPolicy, find_original_sign_in_account};
use crate::claims::IdTokenClaims;
use crate::config::{AuthConfig, B2cPolicies};
use crate::provider::{EventHandler, IdentitySessionProvider, SilentRequest};
use crate::subscription::EventSubscription;

/// Status recorded once a silent sign-on succeeds.
pub const SSO_SILENT_SUCCESS_STATUS: &str = "ssoSilent success";

/// What the reconciler did with one event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reaction {
    Ignored,
    /// A silent request went out. `matched` is the number of candidate
    /// sign-in accounts that were found.
    SilentReauthRequested { matched: usize, with_account: bool },
    /// Several candidates were found and the ambiguity policy said skip.
    SilentReauthSkipped { matched: usize },
    StatusRecorded,
}

struct Inner<P: ?Sized> {
    provider: Arc<P>,
    policies: B2cPolicies,
    ambiguous_accounts: AmbiguousAccountPolicy,
    status: RwLock<Option<String>>,
}

impl<P> Inner<P>
where
    P: IdentitySessionProvider + ?Sized,
{
    fn handle(&self, event: &IdentityEvent) -> Reaction {
        tracing::debug!(
            event_type = %event.kind(),
            occurred_at = %event.timestamp(),
            error = event.error(),
            "identity event received"
        );
        let Some(payload) = event.payload() else {
            return Reaction::Ignored;
        };
        if payload.account.is_none() {
            return Reaction::Ignored;
        }

        match event.kind() {
            EventType::LoginSuccess | EventType::AcquireTokenSuccess => {
                self.realign_after_profile_edit(event.kind(), &payload.id_token_claims)
            }
            EventType::SsoSilentSuccess => {
                let mut status = self.status.write().unwrap_or_else(PoisonError::into_inner);
                if status.is_none() {
                    tracing::info!("silent sign-on succeeded");
                }
                *status = Some(SSO_SILENT_SUCCESS_STATUS.to_string());
                Reaction::StatusRecorded
            }
            _ => Reaction::Ignored,
        }
    }

    fn realign_after_profile_edit(&self, kind: EventType, claims: &IdTokenClaims) -> Reaction {
        if !claims.is_issued_under(&self.policies.edit_profile) {
            return Reaction::Ignored;
        }

        let found = find_original_sign_in_account(
            self.provider.get_all_accounts(),
            claims,
            &self.policies.sign_up_sign_in,
        );
        let matched = found.count();
        if matched > 1 {
            tracing::warn!(
                matches = matched,
                policy = ?self.ambiguous_accounts,
                "several sign-in accounts match the edited profile"
            );
        }

        let Some(account) = found.resolve(self.ambiguous_accounts) else {
            tracing::warn!(matches = matched, "silent re-authentication skipped");
            return Reaction::SilentReauthSkipped { matched };
        };

        let with_account = account.is_some();
        if !with_account {
            tracing::debug!("no original sign-in account cached; requesting without hint");
        }

        self.provider.sso_silent(SilentRequest {
            authority: self.policies.sign_up_sign_in_authority.clone(),
            account,
        });
        tracing::info!(
            event_type = %kind,
            policy = %self.policies.sign_up_sign_in,
            with_account,
            "requested silent re-authentication after profile edit"
        );

        Reaction::SilentReauthRequested {
            matched,
            with_account,
        }
    }
}

/// Reconciles identity events against the configured policies.
///
/// Cheap to clone; clones share status.
pub struct AuthEventReconciler<P: ?Sized> {
    inner: Arc<Inner<P>>,
}

impl<P> AuthEventReconciler<P>
where
    P: IdentitySessionProvider + ?Sized + 'static,
{
    pub fn new(provider: Arc<P>, config: &AuthConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                policies: config.policies.clone(),
                ambiguous_accounts: config.ambiguous_accounts,
                status: RwLock::new(None),
            }),
        }
    }

    /// Create a reconciler and subscribe it in one step.
    pub fn mount(provider: Arc<P>, config: &AuthConfig) -> MountedReconciler<P> {
        let reconciler = Self::new(provider, config);
        let subscription = reconciler.subscribe();
        MountedReconciler {
            subscription,
            reconciler,
        }
    }

    /// Register with the provider. Events stop when the guard drops.
    ///
    /// Only [`mount`](Self::mount) calls this, so a reconciler has at most one
    /// live registration. The registered callback only holds a weak
    /// reference, so it becomes a no-op once every clone is gone.
    fn subscribe(&self) -> EventSubscription<P> {
        let weak: Weak<Inner<P>> = Arc::downgrade(&self.inner);
        let handler: EventHandler = Arc::new(move |event: &IdentityEvent| {
            if let Some(inner) = weak.upgrade() {
                inner.handle(event);
            }
        });
        EventSubscription::acquire(Arc::clone(&self.inner.provider), handler)
    }

    pub fn handle_event(&self, event: &IdentityEvent) -> Reaction {
        self.inner.handle(event)
    }

    pub fn status(&self) -> Option<String> {
        self.inner
            .status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<P: ?Sized> Clone for AuthEventReconciler<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: ?Sized> core::fmt::Debug for AuthEventReconciler<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthEventReconciler")
            .field("policies", &self.inner.policies)
            .field("ambiguous_accounts", &self.inner.ambiguous_accounts)
            .finish_non_exhaustive()
    }
}

/// A reconciler bound to its subscription for one lifetime.
///
/// Status starts absent and is discarded with the mount; dropping it
/// unsubscribes.
pub struct MountedReconciler<P>
where
    P: IdentitySessionProvider + ?Sized + 'static,
{
    subscription: EventSubscription<P>,
    reconciler: AuthEventReconciler<P>,
}

impl<P> MountedReconciler<P>
where
    P: IdentitySessionProvider + ?Sized + 'static,
{
    pub fn status(&self) -> Option<String> {
        self.reconciler.status()
    }

    pub fn reconciler(&self) -> &AuthEventReconciler<P> {
        &self.reconciler
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }
}

impl<P> core::fmt::Debug for MountedReconciler<P>
where
    P: IdentitySessionProvider + ?Sized + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MountedReconciler")
            .field("subscription", &self.subscription)
            .field("status", &self.status())
            .finish()
    }
}
