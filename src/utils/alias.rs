//! Alias generation and validation utilities.
//!
//! Aliases are the path segment of a short URL, so they are restricted to a
//! URL-path-safe alphabet and may not shadow system routes.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Prefix of aliases synthesized when no suggestion is usable.
pub const FALLBACK_PREFIX: &str = "link-";

/// Length of the random token appended to [`FALLBACK_PREFIX`].
const FALLBACK_TOKEN_LEN: usize = 6;

const FALLBACK_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub const MIN_ALIAS_LEN: usize = 3;
pub const MAX_ALIAS_LEN: usize = 32;

/// Aliases that would collide with system routes.
const RESERVED_ALIASES: &[&str] = &["api", "health", "static", "admin", "favicon.ico"];

/// Generates a random fallback alias such as `link-k3x9qa`.
///
/// Collisions are possible; the registry retries on conflict.
pub fn generate_fallback_alias() -> String {
    let mut rng = rand::rng();

    let token: String = (0..FALLBACK_TOKEN_LEN)
        .map(|_| {
            let idx = rng.random_range(0..FALLBACK_CHARSET.len());
            FALLBACK_CHARSET[idx] as char
        })
        .collect();

    format!("{FALLBACK_PREFIX}{token}")
}

static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Validates a caller-supplied alias.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, `-`, `_`
/// - Cannot start or end with a hyphen
/// - Cannot be a reserved route name (case-insensitive)
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.len() < MIN_ALIAS_LEN || alias.len() > MAX_ALIAS_LEN {
        return Err(AppError::bad_request(
            "Alias must be 3-32 characters",
            json!({ "provided_length": alias.len() }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Alias can only contain letters, digits, hyphens and underscores",
            json!({ "alias": alias }),
        ));
    }

    if alias.starts_with('-') || alias.ends_with('-') {
        return Err(AppError::bad_request(
            "Alias cannot start or end with a hyphen",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_ALIASES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(alias))
    {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}

/// Turns a free-form suggestion into an alias candidate.
///
/// Strips quotes and trailing punctuation, lower-cases, and turns inner
/// whitespace into hyphens. Returns `None` if the result is still not a
/// valid alias.
pub fn sanitize_suggestion(raw: &str) -> Option<String> {
    let first_line = raw.lines().next().unwrap_or_default();

    let trimmed = first_line
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '.' | '/'))
        .trim();

    let candidate: String = trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase();

    validate_alias(&candidate).ok().map(|_| candidate)
}
