use std::sync::Arc;

use taskdesk_auth::{
    AuthConfig, AuthEventReconciler, IdentitySessionProvider, InMemoryIdentityProvider,
    MountedReconciler, SessionAccount,
};

use super::todos::TodoStore;

/// Shared handler state.
///
/// The reconciler stays mounted (and subscribed) until the last clone of
/// this state is dropped.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<InMemoryIdentityProvider>,
    pub reconciler: Arc<MountedReconciler<InMemoryIdentityProvider>>,
    pub todos: Arc<TodoStore>,
}

impl AppState {
    pub fn new(auth: &AuthConfig) -> Self {
        Self::with_provider(InMemoryIdentityProvider::shared(), auth)
    }

    pub fn with_provider(provider: Arc<InMemoryIdentityProvider>, auth: &AuthConfig) -> Self {
        let reconciler = AuthEventReconciler::mount(Arc::clone(&provider), auth);
        Self {
            provider,
            reconciler: Arc::new(reconciler),
            todos: Arc::new(TodoStore::new()),
        }
    }

    /// The account pages render for: the first one the provider knows.
    pub fn active_account(&self) -> Option<SessionAccount> {
        self.provider.get_all_accounts().into_iter().next()
    }

    pub fn session(&self) -> SessionView {
        SessionView {
            account: self.active_account(),
        }
    }
}

/// What the layout needs to know about the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub account: Option<SessionAccount>,
}

impl SessionView {
    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    pub fn display_name(&self) -> Option<&str> {
        self.account
            .as_ref()
            .map(|a| a.id_token_claims.name().unwrap_or(a.username.as_str()))
    }
}
