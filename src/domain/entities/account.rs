//! Account entity and the authenticated caller identity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account. Links are owned by accounts through `username`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub username: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Identity of the party making a request.
///
/// Produced by authentication and trusted as-is by the services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub username: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }

    /// Whether this caller may act on resources owned by `owner`.
    pub fn can_manage(&self, owner: &str) -> bool {
        self.is_admin || (!self.username.is_empty() && self.username == owner)
    }
}

impl From<&Account> for Caller {
    fn from(account: &Account) -> Self {
        Self::new(account.username.clone(), account.is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_manage_own_resources() {
        let caller = Caller::new("alice", false);

        assert!(caller.can_manage("alice"));
        assert!(!caller.can_manage("bob"));
    }

    #[test]
    fn test_admin_can_manage_anything() {
        let caller = Caller::new("root", true);

        assert!(caller.can_manage("alice"));
        assert!(caller.can_manage(""));
    }

    #[test]
    fn test_empty_identity_manages_nothing() {
        assert!(!Caller::new("", false).can_manage(""));
    }

    #[test]
    fn test_caller_from_account() {
        let account = Account {
            username: "carol".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };

        assert_eq!(Caller::from(&account), Caller::new("carol", true));
    }
}
