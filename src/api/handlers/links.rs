//! Handlers for link management endpoints (create, list, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use serde_json::json;
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse, LinkItem, LinkListResponse};
use crate::api::middleware::auth::OptionalCaller;
use crate::domain::entities::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the owner for a creation request, enforcing the anonymous policy.
pub(crate) fn owner_for(state: &AppState, caller: &OptionalCaller) -> Result<String, AppError> {
    match &caller.0 {
        Some(caller) => Ok(caller.username.clone()),
        None if state.settings.allow_anonymous_links => Ok(String::new()),
        None => Err(AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Authorization header is missing or invalid"}),
        )),
    }
}

/// Creates a short link after the content-safety checks pass.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com",          // or "urls": [...]
///   "alias": "my-link",                    // optional
///   "expiration_minutes": 60,              // optional, 0 = never
///   "multi": false                         // optional
/// }
/// ```
///
/// # Errors
///
/// - 400 invalid input
/// - 401 missing token (unless anonymous creation is enabled)
/// - 409 alias taken
/// - 422 a URL or the alias was rejected by the content classifier
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<OptionalCaller>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    let owner = owner_for(&state, &caller)?;

    payload.validate()?;
    let request = payload.into_new_link()?;

    let created = state.link_service.create_link(request, &owner).await?;
    let short_url = state
        .link_service
        .get_short_url(&state.settings.public_base_url, &created.alias);

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            short_alias: created.alias,
            short_url,
            expires_at: created.expires_at,
        }),
    ))
}

/// Lists the caller's links, newest first. Admins see every link.
///
/// # Endpoint
///
/// `GET /api/links`
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<LinkListResponse>, AppError> {
    let links = state.link_service.list_links(&caller).await?;
    let now = Utc::now();

    let items: Vec<LinkItem> = links
        .into_iter()
        .map(|link| {
            let short_url = state
                .link_service
                .get_short_url(&state.settings.public_base_url, &link.alias);
            LinkItem::from_link(link, short_url, now)
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: items.len(),
        items,
    }))
}

/// Permanently deletes a link.
///
/// # Endpoint
///
/// `DELETE /api/links/{alias}`
///
/// # Errors
///
/// Returns 404 if the alias is unknown, 403 if the caller is neither the
/// owner nor an admin.
pub async fn delete_link_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<StatusCode, AppError> {
    state.link_service.delete_link(&alias, &caller).await?;
    Ok(StatusCode::NO_CONTENT)
}
