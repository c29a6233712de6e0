//! Link registry: safety-gated creation, listing and deletion of links.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::application::services::alias_generator::AliasGenerator;
use crate::application::services::classifier_service::{ContentClassifier, Purpose};
use crate::domain::entities::{Caller, CreatedLink, Link, LinkFilter, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::alias::validate_alias;
use crate::utils::url_validator::validate_target_url;

/// Upper bound on destinations per link.
pub const MAX_TARGETS: usize = 20;

/// Longest accepted expiration (one year, in minutes).
pub const MAX_EXPIRATION_MINUTES: i64 = 525_600;

/// Attempts at finding a free alias when the generated one is taken.
const MAX_ALIAS_ATTEMPTS: usize = 10;

/// Service for registering, listing and deleting links.
///
/// Creation runs cheap local checks first (URL shape, alias shape), then the
/// remote content checks, then the atomic insert. A rejected request leaves
/// no record behind.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
    classifier: Arc<ContentClassifier>,
    alias_generator: AliasGenerator,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, classifier: Arc<ContentClassifier>) -> Self {
        let alias_generator = AliasGenerator::new(classifier.clone());
        Self {
            link_repository,
            classifier,
            alias_generator,
        }
    }

    /// Registers a link owned by `owner` (empty for anonymous creation).
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] - no targets, malformed URL, bad alias or expiration
    /// - [`AppError::ContentRejected`] - a URL or the supplied alias was classified unsafe
    /// - [`AppError::Conflict`] - the supplied alias exists, or was taken concurrently
    /// - [`AppError::Internal`] - storage failure, or no free alias could be generated
    pub async fn create_link(&self, request: NewLink, owner: &str) -> Result<CreatedLink, AppError> {
        self.create_link_at(request, owner, Utc::now()).await
    }

    /// [`Self::create_link`] with an explicit creation time.
    pub async fn create_link_at(
        &self,
        request: NewLink,
        owner: &str,
        now: DateTime<Utc>,
    ) -> Result<CreatedLink, AppError> {
        let targets = validate_targets(&request.targets)?;

        if let Some(alias) = &request.alias {
            validate_alias(alias)?;
        }

        let expires_at = expiration_from_minutes(request.expiration_minutes, now)?;

        for target in &targets {
            if !self.classifier.classify(target, Purpose::Url).await.is_safe() {
                return Err(AppError::content_rejected(
                    format!("URL rejected by content policy: {target}"),
                    json!({ "url": target }),
                ));
            }
        }

        let caller_supplied = request.alias.is_some();
        let alias = match request.alias {
            Some(alias) => {
                self.ensure_alias_free(&alias).await?;

                if !self.classifier.classify(&alias, Purpose::Alias).await.is_safe() {
                    return Err(AppError::content_rejected(
                        format!("Alias rejected by content policy: {alias}"),
                        json!({ "alias": alias }),
                    ));
                }

                alias
            }
            None => self.generate_free_alias(&targets[0]).await?,
        };

        let mut link = Link::new(
            alias,
            targets,
            request.multi,
            owner.to_string(),
            now,
            expires_at,
        );

        let mut attempts = 1;
        loop {
            match self.link_repository.create(&link).await {
                Ok(()) => break,
                Err(AppError::Conflict { .. }) if caller_supplied => {
                    return Err(alias_taken(&link.alias));
                }
                Err(AppError::Conflict { .. }) if attempts < MAX_ALIAS_ATTEMPTS => {
                    warn!(alias = %link.alias, "Generated alias taken concurrently, retrying");
                    link.alias = self.alias_generator.fallback();
                    attempts += 1;
                }
                Err(AppError::Conflict { .. }) => return Err(alias_exhausted()),
                Err(e) => return Err(e),
            }
        }

        info!(
            alias = %link.alias,
            owner = %link.owner,
            targets = link.targets.len(),
            multi = link.multi,
            "Link created"
        );

        Ok(CreatedLink {
            alias: link.alias,
            expires_at: link.expires_at,
        })
    }

    /// Suggests an alias for `url` without reserving it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed.
    pub async fn suggest_alias(&self, url: &str) -> Result<String, AppError> {
        let url = validate_target_url(url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "url": url, "reason": e.to_string() }))
        })?;

        Ok(self.alias_generator.generate(&url).await)
    }

    /// Lists the links visible to `caller`: its own, or all for admins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_links(&self, caller: &Caller) -> Result<Vec<Link>, AppError> {
        self.link_repository
            .list(LinkFilter::visible_to(caller))
            .await
    }

    /// Deletes a link owned by `caller` (any link for admins).
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown alias
    /// - [`AppError::Forbidden`] - caller is neither owner nor admin
    /// - [`AppError::Internal`] - database error
    pub async fn delete_link(&self, alias: &str, caller: &Caller) -> Result<(), AppError> {
        let link = self
            .link_repository
            .find(alias)
            .await?
            .ok_or_else(|| link_not_found(alias))?;

        if !link.is_visible_to(caller) {
            return Err(AppError::forbidden(
                "You are not allowed to delete this link",
                json!({ "alias": alias }),
            ));
        }

        self.link_repository.delete(alias).await?;
        info!(alias, by = %caller.username, "Link deleted");

        Ok(())
    }

    /// Constructs the full short URL from a base URL and alias.
    pub fn get_short_url(&self, base_url: &str, alias: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), alias)
    }

    async fn ensure_alias_free(&self, alias: &str) -> Result<(), AppError> {
        if self.link_repository.find(alias).await?.is_some() {
            return Err(alias_taken(alias));
        }
        Ok(())
    }

    /// Generated alias first, then random fallbacks until one is free.
    async fn generate_free_alias(&self, url: &str) -> Result<String, AppError> {
        let mut candidate = self.alias_generator.generate(url).await;

        for _ in 0..MAX_ALIAS_ATTEMPTS {
            if self.link_repository.find(&candidate).await?.is_none() {
                return Ok(candidate);
            }
            candidate = self.alias_generator.fallback();
        }

        Err(alias_exhausted())
    }
}

fn validate_targets(targets: &[String]) -> Result<Vec<String>, AppError> {
    if targets.is_empty() {
        return Err(AppError::bad_request(
            "At least one URL is required",
            json!({}),
        ));
    }

    if targets.len() > MAX_TARGETS {
        return Err(AppError::bad_request(
            format!("At most {MAX_TARGETS} URLs per link"),
            json!({ "provided": targets.len() }),
        ));
    }

    targets
        .iter()
        .map(|url| {
            validate_target_url(url).map_err(|e| {
                AppError::bad_request(
                    "Invalid URL format",
                    json!({ "url": url, "reason": e.to_string() }),
                )
            })
        })
        .collect()
}

fn expiration_from_minutes(
    minutes: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match minutes {
        None | Some(0) => Ok(None),
        Some(m) if m < 0 || m > MAX_EXPIRATION_MINUTES => Err(AppError::bad_request(
            format!("Expiration must be between 0 and {MAX_EXPIRATION_MINUTES} minutes"),
            json!({ "expiration_minutes": m }),
        )),
        Some(m) => Ok(Some(now + Duration::minutes(m))),
    }
}

fn alias_taken(alias: &str) -> AppError {
    AppError::conflict("Alias already exists", json!({ "alias": alias }))
}

fn alias_exhausted() -> AppError {
    AppError::internal(
        "Failed to generate unique alias",
        json!({ "reason": "Too many collisions" }),
    )
}

fn link_not_found(alias: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "alias": alias }))
}
