//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::application::services::Strictness;
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// An unconfigured classifier under the `strict` policy rejects every link,
/// so it reports `degraded`.
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = check_database(&state).await;
    let classifier = check_classifier(&state);

    let all_healthy = database.status == "ok" && classifier.status == "ok";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database,
            classifier,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
        .fetch_one(state.db.as_ref())
        .await
    {
        Ok(count) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Connected, {count} links")),
        },
        Err(e) => {
            tracing::error!(error = %e, "Health check: database unavailable");
            CheckStatus {
                status: "error".to_string(),
                message: Some("Database unavailable".to_string()),
            }
        }
    }
}

fn check_classifier(state: &AppState) -> CheckStatus {
    let classifier = &state.classifier;

    match classifier.backend_name() {
        Some(name) => CheckStatus {
            status: "ok".to_string(),
            message: Some(format!("Configured ({name})")),
        },
        None if classifier.strictness() == Strictness::Strict => CheckStatus {
            status: "error".to_string(),
            message: Some("Not configured, strict policy rejects all links".to_string()),
        },
        None => CheckStatus {
            status: "ok".to_string(),
            message: Some("Not configured, permissive policy".to_string()),
        },
    }
}
