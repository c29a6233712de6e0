//! Utility functions shared by the services and the API layer.
//!
//! - [`alias`] - Alias validation, suggestion cleanup and random fallbacks
//! - [`url_validator`] - Destination URL checks

pub mod alias;
pub mod url_validator;
