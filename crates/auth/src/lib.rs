//! `taskdesk-auth`: identity session boundary.
//!
//! Everything that talks to the identity broker goes through
//! [`IdentitySessionProvider`]; this crate never issues, stores or validates
//! tokens itself.

pub mod account;
pub mod account_match;
pub mod claims;
pub mod config;
pub mod in_memory;
pub mod provider;
pub mod reconciler;
pub mod subscription;

pub use account::{AuthResultPayload, IdentityEvent, SessionAccount};
pub use account_match::{AccountMatch, AmbiguousAccountPolicy, find_original_sign_in_account};
pub use claims::{IdTokenClaims, PolicyName};
pub use config::{AuthConfig, B2cPolicies, ConfigError, ProtectedResource};
pub use in_memory::InMemoryIdentityProvider;
pub use provider::{EventHandler, IdentitySessionProvider, SilentRequest};
pub use reconciler::{AuthEventReconciler, MountedReconciler, Reaction, SSO_SILENT_SUCCESS_STATUS};
pub use subscription::EventSubscription;
