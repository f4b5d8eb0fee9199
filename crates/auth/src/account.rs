use serde::{Deserialize, Serialize};

use taskdesk_core::ObjectId;
use taskdesk_events::AuthEvent;

use crate::claims::IdTokenClaims;

/// An authenticated identity known to the session provider.
///
/// The provider owns and mutates these; everything else reads clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionAccount {
    /// Provider-side cache key (`{oid}-{policy}` for B2C).
    pub home_account_id: String,
    pub username: String,
    pub id_token_claims: IdTokenClaims,
}

impl SessionAccount {
    pub fn new(username: impl Into<String>, id_token_claims: IdTokenClaims) -> Self {
        let home_account_id = match id_token_claims.issuing_policy() {
            Some(policy) => format!("{}-{}", id_token_claims.oid, policy.to_ascii_lowercase()),
            None => id_token_claims.oid.to_string(),
        };
        Self {
            home_account_id,
            username: username.into(),
            id_token_claims,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.id_token_claims.oid
    }
}

/// Result of a completed authentication operation, as carried by events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResultPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<SessionAccount>,
    pub id_token_claims: IdTokenClaims,
}

impl AuthResultPayload {
    /// Payload for an operation that produced `account`.
    pub fn for_account(account: SessionAccount) -> Self {
        Self {
            id_token_claims: account.id_token_claims.clone(),
            account: Some(account),
        }
    }
}

/// Authentication lifecycle event as emitted by the session provider.
pub type IdentityEvent = AuthEvent<AuthResultPayload>;
