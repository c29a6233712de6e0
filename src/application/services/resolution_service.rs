//! Resolution of aliases into redirect targets.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::Resolution;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Turns an alias into a redirect or a choice list and counts the click.
pub struct ResolutionService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> ResolutionService<L> {
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Resolves `alias` at the current time.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown alias
    /// - [`AppError::Expired`] - the link expired; nothing is recorded
    /// - [`AppError::Internal`] - the lookup itself failed
    pub async fn resolve(&self, alias: &str) -> Result<Resolution, AppError> {
        self.resolve_at(alias, Utc::now()).await
    }

    /// [`Self::resolve`] with an explicit clock.
    ///
    /// The click counter update is best-effort: a failed write is logged and
    /// the visitor is still served.
    pub async fn resolve_at(&self, alias: &str, now: DateTime<Utc>) -> Result<Resolution, AppError> {
        let mut link = self
            .link_repository
            .find(alias)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "alias": alias })))?;

        if link.is_expired_at(now) {
            debug!(alias, "Link expired");
            return Err(AppError::expired(
                "Short link has expired",
                json!({ "alias": alias, "expires_at": link.expires_at }),
            ));
        }

        link.click_count = link.click_count.saturating_add(1);
        if let Err(e) = self.link_repository.update(&link).await {
            warn!(alias, error = %e, "Failed to record click");
        }

        if link.multi {
            return Ok(Resolution::Choices(link.targets));
        }

        link.primary_target()
            .map(|target| Resolution::Redirect(target.to_string()))
            .ok_or_else(|| {
                AppError::internal("Link has no destination", json!({ "alias": alias }))
            })
    }
}
