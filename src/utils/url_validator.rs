//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted (after trimming); this module
//! only decides whether a string is an acceptable redirect target.

use url::Url;

/// Longest destination URL accepted.
pub const MAX_URL_LEN: usize = 2048;

/// Errors that can occur during URL validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LEN} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("URL contains control characters")]
    ControlCharacter,
}

/// Checks that `input` is an absolute `http`/`https` URL with a host.
///
/// Returns the trimmed input on success. The URL parser silently drops tabs
/// and line breaks, so control characters are rejected before parsing; the
/// stored string must be usable verbatim as a `Location` header.
///
/// # Security
///
/// Rejects potentially dangerous protocols like `javascript:`, `data:`, `file:`, etc.
///
/// # Errors
///
/// See [`UrlValidationError`].
pub fn validate_target_url(input: &str) -> Result<String, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if trimmed.len() > MAX_URL_LEN {
        return Err(UrlValidationError::TooLong);
    }
    if trimmed.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacter);
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(
            validate_target_url("https://example.com"),
            Ok("https://example.com".to_string())
        );
        assert!(validate_target_url("http://example.com/path?q=1#frag").is_ok());
    }

    #[test]
    fn test_keeps_url_verbatim() {
        let url = "https://Example.com:443/Path";
        assert_eq!(validate_target_url(url), Ok(url.to_string()));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_target_url("  https://example.com/a \n"),
            Ok("https://example.com/a".to_string())
        );
    }

    #[test]
    fn test_rejects_control_characters() {
        for url in [
            "https://example.com/a\nb",
            "https://example.com/a\r\nSet-Cookie: x=1",
            "https://exa\tmple.com/",
            "https://example.com/\u{7f}",
            "https://example.com/\u{0}",
        ] {
            assert_eq!(
                validate_target_url(url),
                Err(UrlValidationError::ControlCharacter),
                "{url:?}"
            );
        }
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_target_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
        assert!(validate_target_url("/just/a/path").is_err());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in [
            "ftp://example.com",
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "mailto:someone@example.com",
        ] {
            assert_eq!(
                validate_target_url(url),
                Err(UrlValidationError::UnsupportedProtocol),
                "{url}"
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_target_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LEN));
        assert_eq!(validate_target_url(&url), Err(UrlValidationError::TooLong));
    }
}
