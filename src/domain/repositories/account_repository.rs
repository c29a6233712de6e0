//! Repository trait for accounts.

use crate::domain::entities::Account;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage of link owners.
///
/// Removing an account also removes its API tokens. Links are not touched
/// here; see [`crate::application::services::AccountService::remove_owner`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the username is taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, username: &str, is_admin: bool) -> Result<Account, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, username: &str) -> Result<Option<Account>, AppError>;

    /// Lists all accounts ordered by username.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Account>, AppError>;

    /// Deletes an account and its tokens.
    ///
    /// Returns `Ok(false)` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, username: &str) -> Result<bool, AppError>;
}
