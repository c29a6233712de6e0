//! Domain layer containing business entities and service boundaries.
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. It defines entities, the storage contracts the services rely on,
//! and the boundary to the external completion service.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`completion`] - Contract for the external text-completion service

pub mod completion;
pub mod entities;
pub mod repositories;
