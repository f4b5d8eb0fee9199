//! Identity policy configuration.
//!
//! Values come from environment variables through a lookup function, so
//! tests can inject a map instead of mutating the process environment.

use thiserror::Error;
use url::Url;

use crate::account_match::AmbiguousAccountPolicy;
use crate::claims::PolicyName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// The two policies the shell knows about and their authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B2cPolicies {
    pub sign_up_sign_in: PolicyName,
    pub edit_profile: PolicyName,
    pub sign_up_sign_in_authority: Url,
    pub authority_domain: String,
}

impl B2cPolicies {
    /// Derive the sign-in authority as `https://{domain}/{tenant}.onmicrosoft.com/{policy}`.
    pub fn for_tenant(
        tenant: &str,
        authority_domain: &str,
        sign_up_sign_in: PolicyName,
        edit_profile: PolicyName,
    ) -> Result<Self, ConfigError> {
        if tenant.trim().is_empty() {
            return Err(ConfigError::invalid("B2C_TENANT", "must not be empty"));
        }
        let authority = |key: &'static str, policy: &PolicyName| -> Result<Url, ConfigError> {
            if policy.as_str().trim().is_empty() {
                return Err(ConfigError::invalid(key, "policy name must not be empty"));
            }
            Url::parse(&format!(
                "https://{authority_domain}/{tenant}.onmicrosoft.com/{policy}"
            ))
            .map_err(|e| ConfigError::invalid(key, e.to_string()))
        };

        if edit_profile.as_str().trim().is_empty() {
            return Err(ConfigError::invalid(
                "B2C_EDIT_PROFILE_POLICY",
                "policy name must not be empty",
            ));
        }

        Ok(Self {
            sign_up_sign_in_authority: authority("B2C_SIGN_UP_SIGN_IN_POLICY", &sign_up_sign_in)?,
            sign_up_sign_in,
            edit_profile,
            authority_domain: authority_domain.to_string(),
        })
    }
}

/// A downstream API that needs an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedResource {
    pub endpoint: Url,
    pub scopes: Vec<String>,
}

/// Identity configuration consumed by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub policies: B2cPolicies,
    pub todo_list_api: ProtectedResource,
    pub ambiguous_accounts: AmbiguousAccountPolicy,
}

impl AuthConfig {
    pub const DEFAULT_TENANT: &'static str = "fabrikamb2c";
    pub const DEFAULT_SIGN_UP_SIGN_IN: &'static str = "B2C_1_susi_v2";
    pub const DEFAULT_EDIT_PROFILE: &'static str = "B2C_1_edit_profile_v2";
    pub const DEFAULT_TODO_LIST_ENDPOINT: &'static str = "http://localhost:5000/api/todolist";

    /// Create config from environment variables.
    ///
    /// # Optional env vars
    /// - `B2C_TENANT`: tenant name (default `fabrikamb2c`)
    /// - `B2C_AUTHORITY_DOMAIN`: authority host (default `{tenant}.b2clogin.com`)
    /// - `B2C_SIGN_UP_SIGN_IN_POLICY`, `B2C_EDIT_PROFILE_POLICY`: policy names
    /// - `B2C_AMBIGUOUS_ACCOUNTS`: `first`, `omit` or `skip`
    /// - `TODOLIST_API_ENDPOINT`, `TODOLIST_API_SCOPES` (comma-separated)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tenant = lookup("B2C_TENANT").unwrap_or_else(|| Self::DEFAULT_TENANT.to_string());
        let domain =
            lookup("B2C_AUTHORITY_DOMAIN").unwrap_or_else(|| format!("{tenant}.b2clogin.com"));
        let susi = lookup("B2C_SIGN_UP_SIGN_IN_POLICY")
            .unwrap_or_else(|| Self::DEFAULT_SIGN_UP_SIGN_IN.to_string());
        let edit = lookup("B2C_EDIT_PROFILE_POLICY")
            .unwrap_or_else(|| Self::DEFAULT_EDIT_PROFILE.to_string());

        let policies =
            B2cPolicies::for_tenant(&tenant, &domain, PolicyName::new(susi), PolicyName::new(edit))?;

        let ambiguous_accounts = match lookup("B2C_AMBIGUOUS_ACCOUNTS") {
            Some(raw) => raw
                .parse::<AmbiguousAccountPolicy>()
                .map_err(|e: String| ConfigError::invalid("B2C_AMBIGUOUS_ACCOUNTS", e))?,
            None => AmbiguousAccountPolicy::default(),
        };

        let endpoint_raw = lookup("TODOLIST_API_ENDPOINT")
            .unwrap_or_else(|| Self::DEFAULT_TODO_LIST_ENDPOINT.to_string());
        let endpoint = endpoint_raw
            .parse::<Url>()
            .map_err(|e: url::ParseError| ConfigError::invalid("TODOLIST_API_ENDPOINT", e.to_string()))?;

        let scopes = match lookup("TODOLIST_API_SCOPES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => vec![
                format!("https://{tenant}.onmicrosoft.com/tasks-api/tasks.read"),
                format!("https://{tenant}.onmicrosoft.com/tasks-api/tasks.write"),
            ],
        };

        Ok(Self {
            policies,
            todo_list_api: ProtectedResource { endpoint, scopes },
            ambiguous_accounts,
        })
    }

    /// Config with every variable at its default.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }

    #[must_use]
    pub fn with_ambiguous_accounts(mut self, policy: AmbiguousAccountPolicy) -> Self {
        self.ambiguous_accounts = policy;
        self
    }
}
