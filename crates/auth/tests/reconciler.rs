use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use taskdesk_auth::{
    AmbiguousAccountPolicy, AuthConfig, AuthEventReconciler, AuthResultPayload, EventHandler,
    IdTokenClaims, IdentityEvent, IdentitySessionProvider, InMemoryIdentityProvider, Reaction,
    SSO_SILENT_SUCCESS_STATUS, SessionAccount, SilentRequest,
};
use taskdesk_core::{CallbackId, ObjectId, SubjectId};
use taskdesk_events::EventType;

/// Provider fake that records every interaction.
#[derive(Default)]
struct RecordingProvider {
    accounts: Vec<SessionAccount>,
    refuse_registration: bool,
    handlers: Mutex<Vec<(CallbackId, EventHandler)>>,
    added: Mutex<Vec<CallbackId>>,
    removed: Mutex<Vec<CallbackId>>,
    silent: Mutex<Vec<SilentRequest>>,
}

impl RecordingProvider {
    fn with_accounts(accounts: Vec<SessionAccount>) -> Arc<Self> {
        Arc::new(Self {
            accounts,
            ..Default::default()
        })
    }

    fn emit(&self, event: &IdentityEvent) {
        let handlers: Vec<EventHandler> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();
        for handler in handlers {
            handler(event);
        }
    }

    fn silent(&self) -> Vec<SilentRequest> {
        self.silent.lock().unwrap().clone()
    }

    fn removed(&self) -> Vec<CallbackId> {
        self.removed.lock().unwrap().clone()
    }
}

impl IdentitySessionProvider for RecordingProvider {
    fn add_event_callback(&self, handler: EventHandler) -> Option<CallbackId> {
        if self.refuse_registration {
            return None;
        }
        let id = CallbackId::new();
        self.handlers.lock().unwrap().push((id, handler));
        self.added.lock().unwrap().push(id);
        Some(id)
    }

    fn remove_event_callback(&self, id: CallbackId) {
        self.handlers.lock().unwrap().retain(|(existing, _)| *existing != id);
        self.removed.lock().unwrap().push(id);
    }

    fn get_all_accounts(&self) -> Vec<SessionAccount> {
        self.accounts.clone()
    }

    fn sso_silent(&self, request: SilentRequest) {
        self.silent.lock().unwrap().push(request);
    }
}

fn config() -> AuthConfig {
    AuthConfig::defaults().unwrap()
}

fn identity() -> IdTokenClaims {
    let oid = ObjectId::new();
    IdTokenClaims::new(SubjectId::new(oid.to_string()), oid)
}

fn susi_account(claims: &IdTokenClaims, username: &str) -> SessionAccount {
    SessionAccount::new(
        username,
        claims.clone().with_policy(&config().policies.sign_up_sign_in),
    )
}

fn edited_profile_event(event_type: EventType, claims: &IdTokenClaims) -> IdentityEvent {
    let edited = claims.clone().with_policy(&config().policies.edit_profile);
    IdentityEvent::new(
        event_type,
        Some(AuthResultPayload::for_account(SessionAccount::new("me", edited))),
    )
}

fn silent_success(claims: &IdTokenClaims) -> IdentityEvent {
    IdentityEvent::new(
        EventType::SsoSilentSuccess,
        Some(AuthResultPayload::for_account(susi_account(claims, "me"))),
    )
}

#[test]
fn profile_edit_login_requests_silent_sign_in_with_original_account() {
    let me = identity();
    let original = susi_account(&me, "me");
    let provider = RecordingProvider::with_accounts(vec![
        susi_account(&identity(), "someone-else"),
        original.clone(),
    ]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let reaction = reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));

    assert_eq!(
        reaction,
        Reaction::SilentReauthRequested { matched: 1, with_account: true }
    );
    let requests = provider.silent();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].account.as_ref(), Some(&original));
    assert_eq!(requests[0].authority, config().policies.sign_up_sign_in_authority);
}

#[test]
fn token_acquisition_under_edit_profile_is_handled_like_login() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    reconciler.handle_event(&edited_profile_event(EventType::AcquireTokenSuccess, &me));

    assert_eq!(provider.silent().len(), 1);
}

#[test]
fn missing_original_account_still_requests_without_hint() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let reaction = reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));

    assert_eq!(
        reaction,
        Reaction::SilentReauthRequested { matched: 0, with_account: false }
    );
    let requests = provider.silent();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].account.is_none());
}

#[test]
fn login_under_sign_in_policy_is_left_alone() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let event = IdentityEvent::new(
        EventType::LoginSuccess,
        Some(AuthResultPayload::for_account(susi_account(&me, "me"))),
    );

    assert_eq!(reconciler.handle_event(&event), Reaction::Ignored);
    assert!(provider.silent().is_empty());
}

#[test]
fn legacy_acr_claim_identifies_the_edit_profile_policy() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let mut legacy = me.clone();
    legacy.acr = Some(config().policies.edit_profile.as_str().to_ascii_lowercase());
    let event = IdentityEvent::new(
        EventType::LoginSuccess,
        Some(AuthResultPayload::for_account(SessionAccount::new("me", legacy))),
    );

    assert!(matches!(
        reconciler.handle_event(&event),
        Reaction::SilentReauthRequested { .. }
    ));
}

#[test]
fn edit_profile_policy_claim_matches_regardless_of_case() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let mut shouted = me.clone();
    shouted.tfp = Some(config().policies.edit_profile.as_str().to_ascii_uppercase());
    let event = IdentityEvent::new(
        EventType::LoginSuccess,
        Some(AuthResultPayload::for_account(SessionAccount::new("me", shouted))),
    );

    assert_eq!(
        reconciler.handle_event(&event),
        Reaction::SilentReauthRequested { matched: 1, with_account: true }
    );
    assert_eq!(provider.silent().len(), 1);
}

#[test]
fn non_guid_subject_is_reconciled_by_value() {
    let placeholder = SubjectId::new("Not supported currently. Use oid claim.");
    let me = IdTokenClaims::new(placeholder.clone(), ObjectId::new());
    let other = IdTokenClaims::new(placeholder, ObjectId::new());
    let original = susi_account(&me, "me");
    let provider = RecordingProvider::with_accounts(vec![
        susi_account(&other, "other"),
        original.clone(),
    ]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));

    let requests = provider.silent();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].account.as_ref(), Some(&original));
}

#[test]
fn event_without_account_is_ignored() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

    let edited = me.with_policy(&config().policies.edit_profile);
    let event = IdentityEvent::new(
        EventType::LoginSuccess,
        Some(AuthResultPayload { account: None, id_token_claims: edited }),
    );

    assert_eq!(reconciler.handle_event(&event), Reaction::Ignored);
    assert_eq!(reconciler.handle_event(&IdentityEvent::new(EventType::SsoSilentSuccess, None)), Reaction::Ignored);
    assert!(provider.silent().is_empty());
    assert_eq!(reconciler.status(), None);
}

#[test]
fn ambiguous_accounts_follow_configured_policy() {
    let me = identity();
    let accounts = vec![susi_account(&me, "first"), susi_account(&me, "second")];

    let provider = RecordingProvider::with_accounts(accounts.clone());
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());
    reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));
    assert_eq!(provider.silent()[0].account.as_ref().map(|a| a.username.as_str()), Some("first"));

    let provider = RecordingProvider::with_accounts(accounts.clone());
    let omit = config().with_ambiguous_accounts(AmbiguousAccountPolicy::OmitAccount);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &omit);
    reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));
    assert!(provider.silent()[0].account.is_none());

    let provider = RecordingProvider::with_accounts(accounts);
    let skip = config().with_ambiguous_accounts(AmbiguousAccountPolicy::Skip);
    let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &skip);
    let reaction = reconciler.handle_event(&edited_profile_event(EventType::LoginSuccess, &me));
    assert_eq!(reaction, Reaction::SilentReauthSkipped { matched: 2 });
    assert!(provider.silent().is_empty());
}

#[test]
fn silent_success_sets_status_once_and_is_idempotent() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![]);
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &config());
    assert_eq!(mounted.status(), None);

    provider.emit(&silent_success(&me));
    assert_eq!(mounted.status().as_deref(), Some(SSO_SILENT_SUCCESS_STATUS));

    provider.emit(&silent_success(&me));
    assert_eq!(mounted.status().as_deref(), Some(SSO_SILENT_SUCCESS_STATUS));
    assert!(provider.silent().is_empty());
}

#[test]
fn unmount_unsubscribes_exactly_once_without_events() {
    let provider = RecordingProvider::with_accounts(vec![]);
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &config());
    assert!(mounted.is_subscribed());
    let added = provider.added.lock().unwrap().clone();

    drop(mounted);

    assert_eq!(provider.removed(), added);
    assert!(provider.handlers.lock().unwrap().is_empty());
}

#[test]
fn mounted_reconciler_handles_each_event_once() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &config());
    let clone = mounted.reconciler().clone();

    provider.emit(&edited_profile_event(EventType::LoginSuccess, &me));

    assert_eq!(provider.added.lock().unwrap().len(), 1);
    assert_eq!(provider.silent().len(), 1);

    drop(clone);
    drop(mounted);
    assert_eq!(provider.removed().len(), 1);
}

#[test]
fn unsubscribe_runs_on_unwind() {
    let provider = RecordingProvider::with_accounts(vec![]);
    let inner = Arc::clone(&provider);

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let _mounted = AuthEventReconciler::mount(inner, &config());
        panic!("render failed");
    }));

    assert!(result.is_err());
    assert_eq!(provider.removed().len(), 1);
}

#[test]
fn refused_registration_yields_inactive_subscription() {
    let provider = Arc::new(RecordingProvider {
        refuse_registration: true,
        ..Default::default()
    });
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &config());
    assert!(!mounted.is_subscribed());

    drop(mounted);
    assert!(provider.removed().is_empty());
}

#[test]
fn events_after_unmount_are_not_delivered() {
    let me = identity();
    let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &config());
    let reconciler = mounted.reconciler().clone();
    drop(mounted);

    provider.emit(&edited_profile_event(EventType::LoginSuccess, &me));
    provider.emit(&silent_success(&me));

    assert!(provider.silent().is_empty());
    assert_eq!(reconciler.status(), None);
}

#[test]
fn full_profile_edit_round_trip_through_in_memory_provider() {
    let provider = InMemoryIdentityProvider::shared();
    let cfg = config();
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &cfg);

    let me = identity();
    provider.complete_sign_in(
        EventType::LoginSuccess,
        "me",
        me.clone().with_policy(&cfg.policies.sign_up_sign_in),
    );
    assert!(provider.silent_requests().is_empty());

    provider.complete_sign_in(
        EventType::LoginSuccess,
        "me",
        me.clone().with_policy(&cfg.policies.edit_profile),
    );
    assert_eq!(provider.pending_silent_requests(), 1);
    assert_eq!(mounted.status(), None);

    assert_eq!(provider.resolve_silent_requests(), 1);
    assert_eq!(mounted.status().as_deref(), Some(SSO_SILENT_SUCCESS_STATUS));

    let request = &provider.silent_requests()[0];
    let hinted = request.account.as_ref().unwrap();
    assert!(hinted.id_token_claims.is_issued_under(&cfg.policies.sign_up_sign_in));
    assert_eq!(hinted.object_id(), me.oid);

    drop(mounted);
    assert_eq!(provider.callback_count(), 0);
}

#[test]
fn silent_failure_leaves_status_absent() {
    let provider = InMemoryIdentityProvider::shared();
    let cfg = config();
    let mounted = AuthEventReconciler::mount(Arc::clone(&provider), &cfg);

    // Edit-profile login with no cached sign-in account.
    provider.complete_sign_in(
        EventType::LoginSuccess,
        "me",
        identity().with_policy(&cfg.policies.edit_profile),
    );
    provider.resolve_silent_requests();

    assert_eq!(mounted.status(), None);
}

fn ignored_event_type() -> impl Strategy<Value = EventType> {
    proptest::sample::select(
        EventType::ALL
            .iter()
            .copied()
            .filter(|t| {
                !matches!(
                    t,
                    EventType::LoginSuccess
                        | EventType::AcquireTokenSuccess
                        | EventType::SsoSilentSuccess
                )
            })
            .collect::<Vec<_>>(),
    )
}

proptest! {
    #[test]
    fn other_event_types_have_no_effect(event_type in ignored_event_type(), edit in any::<bool>()) {
        let me = identity();
        let provider = RecordingProvider::with_accounts(vec![susi_account(&me, "me")]);
        let reconciler = AuthEventReconciler::new(Arc::clone(&provider), &config());

        let policy = if edit { config().policies.edit_profile } else { config().policies.sign_up_sign_in };
        let account = SessionAccount::new("me", me.with_policy(&policy));
        let event = IdentityEvent::new(event_type, Some(AuthResultPayload::for_account(account)));

        prop_assert_eq!(reconciler.handle_event(&event), Reaction::Ignored);
        prop_assert!(provider.silent().is_empty());
        prop_assert_eq!(reconciler.status(), None);
    }
}
