//! # Linkgate
//!
//! A URL shortener with a content-safety gate, built with Axum and SQLite.
//!
//! Every destination URL, and every alias a caller picks, is screened by an
//! external text classifier before a link is stored. Links may carry several
//! destinations (served as a choice page), expire, and are owned by accounts.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, repository traits, the completion boundary
//! - **Application Layer** ([`application`]) - Registry, resolution, accounts, classifier policy
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite repositories, OpenAI-compatible client
//! - **API Layer** ([`api`]) - REST handlers, DTOs, middleware
//!
//! ## Quick Start
//!
//! ```bash
//! export TOKEN_SIGNING_SECRET="change-me"
//! export OPENAI_API_KEY="sk-..."   # Optional; see CLASSIFIER_STRICTNESS
//!
//! cargo run --bin linkgate-admin -- account create alice
//! cargo run --bin linkgate-admin -- token create --user alice
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        AccountService, AuthService, ContentClassifier, LinkService, ResolutionService, Strictness,
    };
    pub use crate::domain::entities::{Caller, Link, NewLink, Resolution};
    pub use crate::error::AppError;
    pub use crate::state::{AppState, HttpSettings};
}
