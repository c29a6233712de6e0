//! Handler for short URL resolution.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::entities::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Choice page for links with several destinations.
///
/// Renders `templates/choice.html`; targets are listed in stored order.
#[derive(Template, WebTemplate)]
#[template(path = "choice.html")]
pub struct ChoiceTemplate {
    pub alias: String,
    pub targets: Vec<String>,
}

/// Resolves an alias and counts the click.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// # Responses
///
/// - **307 Temporary Redirect** to the destination of a single-target link
/// - **200 OK** HTML choice page for a multi-target link
/// - **404 Not Found** unknown alias
/// - **410 Gone** expired link (the click is not counted)
/// - **500** stored destination cannot be sent as a `Location` header
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    match state.resolution_service.resolve(&alias).await? {
        Resolution::Redirect(target) => {
            let location = HeaderValue::try_from(target.as_str()).map_err(|_| {
                tracing::error!(alias = %alias, "Stored destination is not a valid header value");
                AppError::internal("Invalid stored destination", json!({ "alias": alias }))
            })?;

            Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
        }
        Resolution::Choices(targets) => Ok(ChoiceTemplate { alias, targets }.into_response()),
    }
}
