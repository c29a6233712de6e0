//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;

/// Request to create a link.
///
/// Exactly one of `url` and `urls` must be given.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    pub url: Option<String>,

    #[validate(length(min = 1, max = 20, message = "Between 1 and 20 URLs per link"))]
    pub urls: Option<Vec<String>>,

    pub alias: Option<String>,

    /// Lifetime in minutes; absent or `0` means the link never expires.
    #[validate(range(min = 0, max = 525_600))]
    pub expiration_minutes: Option<i64>,

    /// Serve all URLs as a choice page. Defaults to true when more than one
    /// URL is given.
    pub multi: Option<bool>,
}

impl CreateLinkRequest {
    /// Converts the wire request into a registry request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when both or neither of `url` and
    /// `urls` are present.
    pub fn into_new_link(self) -> Result<NewLink, AppError> {
        let targets = match (self.url, self.urls) {
            (Some(url), None) => vec![url],
            (None, Some(urls)) => urls,
            (Some(_), Some(_)) => {
                return Err(AppError::bad_request(
                    "Provide either 'url' or 'urls', not both",
                    json!({}),
                ));
            }
            (None, None) => {
                return Err(AppError::bad_request(
                    "One of 'url' or 'urls' is required",
                    json!({}),
                ));
            }
        };

        let multi = self.multi.unwrap_or(targets.len() > 1);

        Ok(NewLink {
            targets,
            alias: self.alias.filter(|a| !a.trim().is_empty()),
            expiration_minutes: self.expiration_minutes,
            multi,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLinkResponse {
    pub short_alias: String,
    pub short_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A link as shown to its owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkItem {
    pub alias: String,
    pub short_url: String,
    pub targets: Vec<String>,
    pub multi: bool,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: bool,
    pub click_count: u64,
}

impl LinkItem {
    pub fn from_link(link: Link, short_url: String, now: DateTime<Utc>) -> Self {
        Self {
            expired: link.is_expired_at(now),
            alias: link.alias,
            short_url,
            targets: link.targets,
            multi: link.multi,
            owner: link.owner,
            created_at: link.created_at,
            expires_at: link.expires_at,
            click_count: link.click_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub items: Vec<LinkItem>,
}
