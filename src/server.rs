//! HTTP server initialization and runtime setup.
//!
//! Handles the database pool, classifier wiring, and the Axum server lifecycle.

use crate::application::services::ContentClassifier;
use crate::config::{ClassifierConfig, Config};
use crate::domain::completion::CompletionClient;
use crate::infrastructure::classifier::OpenAiClient;
use crate::infrastructure::persistence::{MIGRATOR, connect_pool};
use crate::routes::app_router;
use crate::state::{AppState, HttpSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the content classifier described by `config`.
///
/// Without an API key the classifier is unconfigured and its verdicts follow
/// the configured strictness.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be constructed.
pub fn build_classifier(config: &ClassifierConfig) -> Result<ContentClassifier> {
    let Some(api_key) = &config.api_key else {
        tracing::warn!(
            strictness = %config.strictness,
            "OPENAI_API_KEY not set, content classifier disabled"
        );
        return Ok(ContentClassifier::unconfigured(config.strictness));
    };

    let client = OpenAiClient::new(
        &config.base_url,
        api_key.clone(),
        config.model.clone(),
        config.timeout(),
    )
    .context("Failed to build classifier HTTP client")?;

    let client: Arc<dyn CompletionClient> = Arc::new(client);
    Ok(ContentClassifier::new(Some(client), config.strictness))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Content classifier
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let classifier = Arc::new(build_classifier(&config.classifier)?);

    let state = AppState::new(
        Arc::new(pool),
        classifier,
        config.token_signing_secret.clone(),
        HttpSettings {
            public_base_url: config.public_base_url.clone(),
            allow_anonymous_links: config.allow_anonymous_links,
        },
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
