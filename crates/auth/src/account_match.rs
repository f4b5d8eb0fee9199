//! Locating the account a profile-edit flow started from.
//!
//! A profile edit issues a token under a different policy than the one the
//! user signed in with. To re-align the session we need the account cached
//! from the original sign-in: same `sub` and `oid`, issued under the
//! sign-up-or-sign-in policy. Nothing guarantees there is exactly one, so the
//! search reports every outcome and the caller picks a policy.

use core::str::FromStr;

use crate::account::SessionAccount;
use crate::claims::{IdTokenClaims, PolicyName};

/// Outcome of searching cached accounts for the original sign-in account.
#[derive(Debug, Clone, PartialEq)]
pub enum AccountMatch {
    None,
    Unique(SessionAccount),
    /// More than one candidate, in provider order.
    Ambiguous(Vec<SessionAccount>),
}

impl AccountMatch {
    pub fn count(&self) -> usize {
        match self {
            AccountMatch::None => 0,
            AccountMatch::Unique(_) => 1,
            AccountMatch::Ambiguous(all) => all.len(),
        }
    }

    /// Decide which account (if any) a silent request should carry.
    ///
    /// Returns `None` when the request must not be issued at all.
    pub fn resolve(self, policy: AmbiguousAccountPolicy) -> Option<Option<SessionAccount>> {
        match self {
            AccountMatch::None => Some(None),
            AccountMatch::Unique(account) => Some(Some(account)),
            AccountMatch::Ambiguous(candidates) => match policy {
                AmbiguousAccountPolicy::UseFirst => Some(candidates.into_iter().next()),
                AmbiguousAccountPolicy::OmitAccount => Some(None),
                AmbiguousAccountPolicy::Skip => None,
            },
        }
    }
}

/// What to do when several cached accounts look like the original sign-in.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum AmbiguousAccountPolicy {
    /// Take the first candidate in provider order.
    #[default]
    UseFirst,
    /// Issue the request without an account hint.
    OmitAccount,
    /// Do not issue the request.
    Skip,
}

impl FromStr for AmbiguousAccountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::UseFirst),
            "omit" => Ok(Self::OmitAccount),
            "skip" => Ok(Self::Skip),
            other => Err(format!("expected one of first, omit, skip (got '{other}')")),
        }
    }
}

/// Find cached accounts with the same identity as `claims` that were issued
/// under `sign_in_policy`.
pub fn find_original_sign_in_account<I>(
    accounts: I,
    claims: &IdTokenClaims,
    sign_in_policy: &PolicyName,
) -> AccountMatch
where
    I: IntoIterator<Item = SessionAccount>,
{
    let mut candidates: Vec<SessionAccount> = accounts
        .into_iter()
        .filter(|account| {
            account.id_token_claims.same_identity(claims)
                && account.id_token_claims.is_issued_under(sign_in_policy)
        })
        .collect();

    match candidates.len() {
        0 => AccountMatch::None,
        1 => AccountMatch::Unique(candidates.remove(0)),
        _ => AccountMatch::Ambiguous(candidates),
    }
}
