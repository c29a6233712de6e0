//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Safety-gated link creation, listing, deletion
//! - [`services::resolution_service::ResolutionService`] - Alias resolution and click counting
//! - [`services::account_service::AccountService`] - Accounts and owner-removal cascade
//! - [`services::auth_service::AuthService`] - API token authentication
//! - [`services::classifier_service::ContentClassifier`] - Content-safety oracle

pub mod services;
