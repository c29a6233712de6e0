//! Business logic services for the application layer.

pub mod account_service;
pub mod alias_generator;
pub mod auth_service;
pub mod classifier_service;
pub mod link_service;
pub mod resolution_service;

pub use account_service::{AccountService, CascadeReport};
pub use alias_generator::AliasGenerator;
pub use auth_service::AuthService;
pub use classifier_service::{ContentClassifier, Purpose, Strictness, Verdict};
pub use link_service::LinkService;
pub use resolution_service::ResolutionService;
