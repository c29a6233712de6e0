//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`classifier`] - Completion service clients
//! - [`persistence`] - SQLite repository implementations

pub mod classifier;
pub mod persistence;
