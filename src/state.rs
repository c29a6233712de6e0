//! Shared application state injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::services::{
    AccountService, AuthService, ContentClassifier, LinkService, ResolutionService,
};
use crate::infrastructure::persistence::{
    SqliteAccountRepository, SqliteLinkRepository, SqliteTokenRepository,
};

/// Settings the HTTP layer needs beyond the services themselves.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Prefix of returned short URLs, e.g. `https://s.example.com`.
    pub public_base_url: String,
    /// When true, link creation works without a bearer token.
    pub allow_anonymous_links: bool,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqlitePool>,
    pub link_service: Arc<LinkService<SqliteLinkRepository>>,
    pub resolution_service: Arc<ResolutionService<SqliteLinkRepository>>,
    pub account_service: Arc<AccountService<SqliteAccountRepository, SqliteLinkRepository>>,
    pub auth_service: Arc<AuthService<SqliteTokenRepository>>,
    pub classifier: Arc<ContentClassifier>,
    pub settings: HttpSettings,
}

impl AppState {
    /// Wires repositories and services on top of a migrated pool.
    pub fn new(
        db: Arc<SqlitePool>,
        classifier: Arc<ContentClassifier>,
        token_signing_secret: String,
        settings: HttpSettings,
    ) -> Self {
        let link_repository = Arc::new(SqliteLinkRepository::new(db.clone()));
        let account_repository = Arc::new(SqliteAccountRepository::new(db.clone()));
        let token_repository = Arc::new(SqliteTokenRepository::new(db.clone()));

        Self {
            link_service: Arc::new(LinkService::new(
                link_repository.clone(),
                classifier.clone(),
            )),
            resolution_service: Arc::new(ResolutionService::new(link_repository.clone())),
            account_service: Arc::new(AccountService::new(account_repository, link_repository)),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
            classifier,
            settings,
            db,
        }
    }
}
