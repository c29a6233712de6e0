//! API route configuration.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, remove_account_handler,
    suggest_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Routes that require a valid Bearer token.
///
/// # Endpoints
///
/// - `GET    /links`              - List the caller's links
/// - `DELETE /links/{alias}`      - Delete a link
/// - `DELETE /accounts/{username}` - Remove an account and its links
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler))
        .route("/links/{alias}", delete(delete_link_handler))
        .route("/accounts/{username}", delete(remove_account_handler))
}

/// Routes where the Bearer token may be omitted when anonymous link
/// creation is enabled.
///
/// # Endpoints
///
/// - `POST /links`   - Create a link
/// - `POST /suggest` - Suggest an alias
pub fn creation_routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link_handler))
        .route("/suggest", post(suggest_handler))
}
