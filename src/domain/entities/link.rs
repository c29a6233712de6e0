//! Link entity: a short alias mapped to one or more destinations.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::account::Caller;

/// A persisted short link.
///
/// `targets` is never empty. When `multi` is false only the first target is
/// used; when true the whole ordered list is offered as a choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub alias: String,
    pub targets: Vec<String>,
    pub multi: bool,
    /// Owning account. Empty for links created anonymously.
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: u64,
}

impl Link {
    /// Creates a fresh link with a zero click count.
    pub fn new(
        alias: String,
        targets: Vec<String>,
        multi: bool,
        owner: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            alias,
            targets,
            multi,
            owner,
            created_at,
            expires_at,
            click_count: 0,
        }
    }

    /// Returns true if the link is dead at `now`.
    ///
    /// Expiry is inclusive: a link expiring at `t` is already dead at `t`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// The single redirect destination (first target).
    pub fn primary_target(&self) -> Option<&str> {
        self.targets.first().map(String::as_str)
    }

    /// Whether `caller` may see or delete this link.
    pub fn is_visible_to(&self, caller: &Caller) -> bool {
        caller.can_manage(&self.owner)
    }
}

/// Selection for [`crate::domain::repositories::LinkRepository::list`].
///
/// Storage backends translate it into their own query; the SQLite store
/// turns `OwnedBy` into an indexed `owner` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFilter {
    All,
    OwnedBy(String),
}

impl LinkFilter {
    /// Everything for admins, own links for everyone else.
    pub fn visible_to(caller: &Caller) -> Self {
        if caller.is_admin {
            Self::All
        } else {
            Self::OwnedBy(caller.username.clone())
        }
    }
}

/// Validated input for the link registry.
///
/// `alias: None` asks the registry to generate one. `expiration_minutes` of
/// zero (or `None`) means the link never expires.
#[derive(Debug, Clone, Default)]
pub struct NewLink {
    pub targets: Vec<String>,
    pub alias: Option<String>,
    pub expiration_minutes: Option<i64>,
    pub multi: bool,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedLink {
    pub alias: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// What a resolved alias points to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Single-target link: redirect immediately.
    Redirect(String),
    /// Multi-target link: present the ordered list as a choice.
    Choices(Vec<String>),
}
