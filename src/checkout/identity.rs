//! Identity

use std::fmt::{Display, Formatter, Result as FmtResult};

use mockall::automock;
use serde::{Deserialize, Serialize};

/// Identifier of an authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap a provider-issued user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Source of the acting customer's identity.
#[automock]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` when nobody is authenticated.
    fn current_user(&self) -> Option<UserId>;

    /// True when somebody is signed in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }
}

/// Identity fixed at construction, e.g. from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<UserId>,
}

impl StaticIdentity {
    /// Signed in as `user`, or anonymous when `None`.
    pub fn new(user: Option<UserId>) -> Self {
        Self { user }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<UserId> {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_identity_reports_its_user() {
        let signed_in = StaticIdentity::new(Some(UserId::new("u1")));

        assert_eq!(signed_in.current_user(), Some(UserId::new("u1")));
        assert!(signed_in.is_authenticated());
    }

    #[test]
    fn default_identity_is_anonymous() {
        assert!(!StaticIdentity::default().is_authenticated());
    }
}
