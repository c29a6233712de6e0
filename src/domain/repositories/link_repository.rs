//! Repository trait for link records (the link store).

use crate::domain::entities::{Link, LinkFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable keyed storage of alias → [`Link`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteLinkRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link if and only if its alias is free.
    ///
    /// The existence check and the write are a single atomic step: of two
    /// concurrent calls for the same alias at most one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the alias already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, link: &Link) -> Result<(), AppError>;

    /// Point lookup by alias.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find(&self, alias: &str) -> Result<Option<Link>, AppError>;

    /// Full-scan enumeration; `filter` is evaluated against every record.
    ///
    /// Results are ordered newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, filter: LinkFilter) -> Result<Vec<Link>, AppError>;

    /// Rewrites an existing record in one atomic statement.
    ///
    /// The stored click count never goes down: if a concurrent writer already
    /// stored a higher count, that count is kept.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, link: &Link) -> Result<(), AppError>;

    /// Removes a record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, alias: &str) -> Result<(), AppError>;
}
