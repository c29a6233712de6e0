//! Handler for alias suggestions.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::suggest::{SuggestRequest, SuggestResponse};
use crate::api::handlers::links::owner_for;
use crate::api::middleware::auth::OptionalCaller;
use crate::error::AppError;
use crate::state::AppState;

/// Suggests an alias for a URL without creating anything.
///
/// # Endpoint
///
/// `POST /api/suggest`
///
/// Same authentication policy as link creation.
pub async fn suggest_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<OptionalCaller>,
    Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, AppError> {
    owner_for(&state, &caller)?;
    payload.validate()?;

    let suggested_alias = state.link_service.suggest_alias(&payload.url).await?;

    Ok(Json(SuggestResponse { suggested_alias }))
}
