use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use taskdesk_core::{ObjectId, SubjectId};

/// Name of a B2C user flow / custom policy (e.g. `B2C_1_susi_v2`).
///
/// The identity service treats policy names case-insensitively, so
/// comparisons go through [`PolicyName::matches`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyName(Cow<'static, str>);

impl PolicyName {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, claim: &str) -> bool {
        self.0.eq_ignore_ascii_case(claim)
    }
}

impl core::fmt::Display for PolicyName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// ID token claims model (transport-agnostic).
///
/// Only the claims this crate reasons about are typed; everything else is
/// kept verbatim in `extra` so nothing is lost on a serde round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject identifier.
    pub sub: SubjectId,

    /// Object identifier of the directory user.
    pub oid: ObjectId,

    /// Trust framework policy that issued the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfp: Option<String>,

    /// Legacy policy claim, used by older tenants instead of `tfp`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acr: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdTokenClaims {
    pub fn new(sub: SubjectId, oid: ObjectId) -> Self {
        Self {
            sub,
            oid,
            tfp: None,
            acr: None,
            extra: Map::new(),
        }
    }

    pub fn with_policy(mut self, policy: &PolicyName) -> Self {
        self.tfp = Some(policy.as_str().to_string());
        self
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Policy the token was issued under: `tfp`, else legacy `acr`.
    pub fn issuing_policy(&self) -> Option<&str> {
        self.tfp.as_deref().or(self.acr.as_deref())
    }

    pub fn is_issued_under(&self, policy: &PolicyName) -> bool {
        self.issuing_policy().is_some_and(|claim| policy.matches(claim))
    }

    /// Same directory identity (`sub` and `oid` both equal).
    pub fn same_identity(&self, other: &IdTokenClaims) -> bool {
        self.sub == other.sub && self.oid == other.oid
    }

    /// Display name, if the flow collected one.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}
