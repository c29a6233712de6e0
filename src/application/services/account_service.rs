//! Account management and owner-removal cascade.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{Account, Caller, LinkFilter};
use crate::domain::repositories::{AccountRepository, LinkRepository};
use crate::error::AppError;

const MAX_USERNAME_LEN: usize = 64;

/// Outcome of removing an owner together with its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub username: String,
    pub deleted_links: usize,
    /// Aliases whose deletion failed; they remain in the store.
    pub failed_links: Vec<String>,
}

pub struct AccountService<A: AccountRepository, L: LinkRepository> {
    account_repository: Arc<A>,
    link_repository: Arc<L>,
}

impl<A: AccountRepository, L: LinkRepository> AccountService<A, L> {
    pub fn new(account_repository: Arc<A>, link_repository: Arc<L>) -> Self {
        Self {
            account_repository,
            link_repository,
        }
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - malformed username
    /// - [`AppError::Conflict`] - username taken
    pub async fn create_account(&self, username: &str, is_admin: bool) -> Result<Account, AppError> {
        validate_username(username)?;

        let account = self.account_repository.create(username, is_admin).await?;
        info!(username, is_admin, "Account created");

        Ok(account)
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.account_repository.list().await
    }

    /// Removes `username` and its links on behalf of `caller`.
    ///
    /// Admins may remove any account; other callers only their own.
    ///
    /// # Errors
    ///
    /// - [`AppError::Forbidden`] - caller may not remove this account
    /// - [`AppError::NotFound`] - unknown account
    pub async fn remove_account(
        &self,
        caller: &Caller,
        username: &str,
    ) -> Result<CascadeReport, AppError> {
        if !caller.can_manage(username) {
            return Err(AppError::forbidden(
                "You are not allowed to remove this account",
                json!({ "username": username }),
            ));
        }

        self.remove_owner(username).await
    }

    /// Deletes the account `username`, then every link it owned.
    ///
    /// Link deletion is best-effort: a failure on one link is logged and
    /// recorded in the report, and the scan continues. The account's tokens
    /// go with it.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown account
    /// - [`AppError::Internal`] - the link scan or account removal failed
    pub async fn remove_owner(&self, username: &str) -> Result<CascadeReport, AppError> {
        if !self.account_repository.delete(username).await? {
            return Err(account_not_found(username));
        }

        let owned = self
            .link_repository
            .list(LinkFilter::OwnedBy(username.to_string()))
            .await?;

        let mut report = CascadeReport {
            username: username.to_string(),
            deleted_links: 0,
            failed_links: Vec::new(),
        };

        for link in owned {
            match self.link_repository.delete(&link.alias).await {
                Ok(()) => report.deleted_links += 1,
                // Deleted concurrently.
                Err(AppError::NotFound { .. }) => {}
                Err(e) => {
                    warn!(alias = %link.alias, username, error = %e, "Failed to delete owned link");
                    report.failed_links.push(link.alias);
                }
            }
        }

        info!(
            username,
            deleted_links = report.deleted_links,
            failed_links = report.failed_links.len(),
            "Account removed"
        );

        Ok(report)
    }
}

fn validate_username(username: &str) -> Result<(), AppError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Username must be 1-64 characters of letters, digits, '-', '_' or '.'",
            json!({ "username": username }),
        ))
    }
}

fn account_not_found(username: &str) -> AppError {
    AppError::not_found("Account not found", json!({ "username": username }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::{MockAccountRepository, MockLinkRepository};
    use chrono::Utc;

    fn account(username: &str) -> Account {
        Account {
            username: username.to_string(),
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    fn owned_link(alias: &str, owner: &str) -> Link {
        Link::new(
            alias.to_string(),
            vec!["https://example.com".to_string()],
            false,
            owner.to_string(),
            Utc::now(),
            None,
        )
    }

    #[tokio::test]
    async fn test_create_account() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_create()
            .withf(|username, is_admin| username == "alice" && !*is_admin)
            .times(1)
            .returning(|username, _| Ok(account(username)));

        let service = AccountService::new(Arc::new(accounts), Arc::new(MockLinkRepository::new()));
        let created = service.create_account("alice", false).await.unwrap();

        assert_eq!(created.username, "alice");
    }

    #[tokio::test]
    async fn test_create_account_rejects_bad_username() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_create().times(0);

        let service = AccountService::new(Arc::new(accounts), Arc::new(MockLinkRepository::new()));

        for bad in ["", "has space", "slash/y"] {
            assert!(matches!(
                service.create_account(bad, false).await,
                Err(AppError::Validation { .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_remove_owner_deletes_only_owned_links() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(1).returning(|_| Ok(true));

        let mut links = MockLinkRepository::new();
        links
            .expect_list()
            .withf(|filter| *filter == LinkFilter::OwnedBy("alice".to_string()))
            .times(1)
            .returning(|_| Ok(vec![owned_link("a1", "alice"), owned_link("a2", "alice")]));
        links.expect_delete().times(2).returning(|_| Ok(()));

        let service = AccountService::new(Arc::new(accounts), Arc::new(links));
        let report = service.remove_owner("alice").await.unwrap();

        assert_eq!(report.deleted_links, 2);
        assert!(report.failed_links.is_empty());
    }

    #[tokio::test]
    async fn test_remove_owner_continues_past_failures() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(1).returning(|_| Ok(true));

        let mut links = MockLinkRepository::new();
        links.expect_list().returning(|_| {
            Ok(vec![
                owned_link("a1", "alice"),
                owned_link("a2", "alice"),
                owned_link("a3", "alice"),
            ])
        });
        links
            .expect_delete()
            .withf(|alias| alias == "a2")
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        links
            .expect_delete()
            .withf(|alias| alias != "a2")
            .times(2)
            .returning(|_| Ok(()));

        let service = AccountService::new(Arc::new(accounts), Arc::new(links));
        let report = service.remove_owner("alice").await.unwrap();

        assert_eq!(report.deleted_links, 2);
        assert_eq!(report.failed_links, vec!["a2".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_owner_with_no_links() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(1).returning(|_| Ok(true));

        let mut links = MockLinkRepository::new();
        links.expect_list().returning(|_| Ok(vec![]));
        links.expect_delete().times(0);

        let service = AccountService::new(Arc::new(accounts), Arc::new(links));
        let report = service.remove_owner("alice").await.unwrap();

        assert_eq!(report.deleted_links, 0);
    }

    #[tokio::test]
    async fn test_remove_owner_unknown_account() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(1).returning(|_| Ok(false));

        let mut links = MockLinkRepository::new();
        links.expect_list().times(0);

        let service = AccountService::new(Arc::new(accounts), Arc::new(links));
        assert!(matches!(
            service.remove_owner("ghost").await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_account_forbidden_for_other_user() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().times(0);

        let service = AccountService::new(Arc::new(accounts), Arc::new(MockLinkRepository::new()));
        let result = service
            .remove_account(&Caller::new("bob", false), "alice")
            .await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_remove_account_self_service() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_delete().returning(|_| Ok(true));

        let mut links = MockLinkRepository::new();
        links.expect_list().returning(|_| Ok(vec![]));

        let service = AccountService::new(Arc::new(accounts), Arc::new(links));
        assert!(
            service
                .remove_account(&Caller::new("alice", false), "alice")
                .await
                .is_ok()
        );
    }
}
