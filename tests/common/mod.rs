#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use linkgate::application::services::auth_service::hash_token;
use linkgate::application::services::{ContentClassifier, Strictness};
use linkgate::domain::completion::{CompletionClient, CompletionError, CompletionRequest};
use linkgate::domain::entities::Link;
use linkgate::domain::repositories::{AccountRepository, LinkRepository, TokenRepository};
use linkgate::infrastructure::persistence::{
    SqliteAccountRepository, SqliteLinkRepository, SqliteTokenRepository, connect_in_memory,
};
use linkgate::routes::router;
use linkgate::state::{AppState, HttpSettings};

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "https://s.example.com";

/// Words the scripted classifier treats as unsafe.
pub const BANNED: &[&str] = &["casino", "beer", "whisky"];

pub async fn test_pool() -> SqlitePool {
    connect_in_memory().await.unwrap()
}

/// Completion client with canned answers.
///
/// Safety checks answer `UNSAFE` when the prompt mentions a banned word.
/// Suggestion requests answer with `suggestion`, or fail when it is `None`.
pub struct ScriptedClient {
    pub suggestion: Option<String>,
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, CompletionError> {
        if request.user_prompt.starts_with("Suggest") {
            return self
                .suggestion
                .clone()
                .ok_or_else(|| CompletionError::Transport("scripted failure".to_string()));
        }

        let prompt = request.user_prompt.to_lowercase();
        if BANNED.iter().any(|word| prompt.contains(word)) {
            Ok("UNSAFE".to_string())
        } else {
            Ok("SAFE".to_string())
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Classifier backed by [`ScriptedClient`] with no suggestions.
pub fn scripted_classifier() -> ContentClassifier {
    classifier_suggesting(None)
}

pub fn classifier_suggesting(suggestion: Option<&str>) -> ContentClassifier {
    let client: Arc<dyn CompletionClient> = Arc::new(ScriptedClient {
        suggestion: suggestion.map(str::to_string),
    });
    ContentClassifier::new(Some(client), Strictness::Strict)
}

pub fn create_test_state(
    pool: SqlitePool,
    classifier: ContentClassifier,
    allow_anonymous_links: bool,
) -> AppState {
    AppState::new(
        Arc::new(pool),
        Arc::new(classifier),
        SIGNING_SECRET.to_string(),
        HttpSettings {
            public_base_url: BASE_URL.to_string(),
            allow_anonymous_links,
        },
    )
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_account(pool: &SqlitePool, username: &str, is_admin: bool) {
    SqliteAccountRepository::new(Arc::new(pool.clone()))
        .create(username, is_admin)
        .await
        .unwrap();
}

/// Creates an account with one token and returns the raw token.
pub async fn create_user_with_token(pool: &SqlitePool, username: &str, is_admin: bool) -> String {
    create_account(pool, username, is_admin).await;

    let token = format!("tok-{username}");
    SqliteTokenRepository::new(Arc::new(pool.clone()))
        .create_token(username, "test", &hash_token(SIGNING_SECRET, &token))
        .await
        .unwrap();

    token
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn link(alias: &str, targets: &[&str], owner: &str) -> Link {
    Link::new(
        alias.to_string(),
        targets.iter().map(|t| t.to_string()).collect(),
        targets.len() > 1,
        owner.to_string(),
        Utc::now(),
        None,
    )
}

pub async fn insert_link(pool: &SqlitePool, link: &Link) {
    SqliteLinkRepository::new(Arc::new(pool.clone()))
        .create(link)
        .await
        .unwrap();
}

pub async fn insert_expiring_link(
    pool: &SqlitePool,
    alias: &str,
    url: &str,
    expires_at: DateTime<Utc>,
) {
    let mut link = link(alias, &[url], "");
    link.expires_at = Some(expires_at);
    insert_link(pool, &link).await;
}

pub async fn find_link(pool: &SqlitePool, alias: &str) -> Option<Link> {
    SqliteLinkRepository::new(Arc::new(pool.clone()))
        .find(alias)
        .await
        .unwrap()
}
