//! Handler for account removal.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::accounts::RemoveAccountResponse;
use crate::domain::entities::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Removes an account and every link it owns.
///
/// # Endpoint
///
/// `DELETE /api/accounts/{username}`
///
/// Admins may remove any account, other callers only their own. Link
/// deletion is best-effort; aliases that could not be removed are listed in
/// `failed_links`.
pub async fn remove_account_handler(
    Path(username): Path<String>,
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<RemoveAccountResponse>, AppError> {
    let report = state
        .account_service
        .remove_account(&caller, &username)
        .await?;

    Ok(Json(report.into()))
}
