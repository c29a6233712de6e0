//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `TOKEN_SIGNING_SECRET` - HMAC key for API token hashing
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite URL (default: `sqlite://data/linkgate.db?mode=rwc`)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `PUBLIC_BASE_URL` - Prefix of returned short URLs (default: `http://localhost:3000`)
//! - `ALLOW_ANONYMOUS_LINKS` - Allow link creation without a token (default: false)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `OPENAI_API_KEY` - Enables the content classifier when set
//! - `CLASSIFIER_BASE_URL` - Chat completions base URL (default: `https://api.openai.com/v1`)
//! - `CLASSIFIER_MODEL` - Model name (default: `gpt-4.1-nano-2025-04-14`)
//! - `CLASSIFIER_TIMEOUT_SECS` - Per-call timeout, 1-120 (default: 10)
//! - `CLASSIFIER_STRICTNESS` - `permissive` or `strict`; verdict when no key is set

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::application::services::Strictness;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/linkgate.db?mode=rwc";
pub const DEFAULT_CLASSIFIER_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-4.1-nano-2025-04-14";

/// Settings for the content classifier.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// `None` leaves the classifier unconfigured.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub strictness: Strictness,
}

impl ClassifierConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub listen_addr: String,
    pub public_base_url: String,
    pub log_level: String,
    pub log_format: String,
    /// HMAC signing secret used to hash API tokens before storage.
    pub token_signing_secret: String,
    /// When true, `POST /api/links` accepts requests without a bearer token.
    pub allow_anonymous_links: bool,
    pub classifier: ClassifierConfig,
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `TOKEN_SIGNING_SECRET` is missing or a numeric or
    /// enumerated variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let database_url = env_or("DATABASE_URL", DEFAULT_DATABASE_URL);

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("DB_MAX_CONNECTIONS must be a positive integer")?
            .unwrap_or(5);

        let listen_addr = env_or("LISTEN", "0.0.0.0:3000");
        let public_base_url = env_or("PUBLIC_BASE_URL", "http://localhost:3000");
        let log_level = env_or("RUST_LOG", "info");
        let log_format = env_or("LOG_FORMAT", "text");

        let token_signing_secret =
            env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

        let allow_anonymous_links = env_flag("ALLOW_ANONYMOUS_LINKS");

        Ok(Self {
            database_url,
            db_max_connections,
            listen_addr,
            public_base_url,
            log_level,
            log_format,
            token_signing_secret,
            allow_anonymous_links,
            classifier: Self::load_classifier()?,
        })
    }

    fn load_classifier() -> Result<ClassifierConfig> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let timeout_secs = env::var("CLASSIFIER_TIMEOUT_SECS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .context("CLASSIFIER_TIMEOUT_SECS must be an integer")?
            .unwrap_or(10);

        let strictness = env::var("CLASSIFIER_STRICTNESS")
            .ok()
            .map(|v| v.parse::<Strictness>())
            .transpose()
            .map_err(anyhow::Error::msg)
            .context("Invalid CLASSIFIER_STRICTNESS")?
            .unwrap_or_default();

        Ok(ClassifierConfig {
            api_key,
            base_url: env_or("CLASSIFIER_BASE_URL", DEFAULT_CLASSIFIER_BASE_URL),
            model: env_or("CLASSIFIER_MODEL", DEFAULT_CLASSIFIER_MODEL),
            timeout_secs,
            strictness,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` or `public_base_url` is malformed
    /// - `database_url` is not an SQLite URL
    /// - the signing secret is empty
    /// - pool size or classifier timeout is out of range
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "PUBLIC_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.public_base_url
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if self.token_signing_secret.is_empty() {
            anyhow::bail!("TOKEN_SIGNING_SECRET must not be empty");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        if !(1..=120).contains(&self.classifier.timeout_secs) {
            anyhow::bail!(
                "CLASSIFIER_TIMEOUT_SECS must be between 1 and 120, got {}",
                self.classifier.timeout_secs
            );
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Public base URL: {}", self.public_base_url);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Anonymous links: {}", self.allow_anonymous_links);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);

        match &self.classifier.api_key {
            Some(key) => tracing::info!(
                "  Classifier: {} via {} (key {}, timeout {}s)",
                self.classifier.model,
                self.classifier.base_url,
                mask_secret(key),
                self.classifier.timeout_secs
            ),
            None => tracing::info!(
                "  Classifier: not configured ({} policy)",
                self.classifier.strictness
            ),
        }
    }
}

/// Keeps the first four characters of a secret and masks the rest.
fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 8 {
        "***".to_string()
    } else {
        format!("{visible}***")
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "DATABASE_URL",
        "DB_MAX_CONNECTIONS",
        "LISTEN",
        "PUBLIC_BASE_URL",
        "LOG_FORMAT",
        "TOKEN_SIGNING_SECRET",
        "ALLOW_ANONYMOUS_LINKS",
        "OPENAI_API_KEY",
        "CLASSIFIER_BASE_URL",
        "CLASSIFIER_MODEL",
        "CLASSIFIER_TIMEOUT_SECS",
        "CLASSIFIER_STRICTNESS",
    ];

    fn clear_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 5,
            listen_addr: "0.0.0.0:3000".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            token_signing_secret: "test-secret".to_string(),
            allow_anonymous_links: false,
            classifier: ClassifierConfig {
                api_key: None,
                base_url: DEFAULT_CLASSIFIER_BASE_URL.to_string(),
                model: DEFAULT_CLASSIFIER_MODEL.to_string(),
                timeout_secs: 10,
                strictness: Strictness::PermissiveIfUnconfigured,
            },
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-abcdefghijkl"), "sk-a***");
        assert_eq!(mask_secret("short"), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.database_url = "postgres://localhost/test".to_string();
        assert!(config.validate().is_err());
        config.database_url = "sqlite::memory:".to_string();

        config.public_base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());
        config.public_base_url = "https://s.example.com".to_string();

        config.classifier.timeout_secs = 0;
        assert!(config.validate().is_err());
        config.classifier.timeout_secs = 121;
        assert!(config.validate().is_err());
        config.classifier.timeout_secs = 120;
        assert!(config.validate().is_ok());

        config.token_signing_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        unsafe {
            env::set_var("TOKEN_SIGNING_SECRET", "secret");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.public_base_url, "http://localhost:3000");
        assert!(!config.allow_anonymous_links);
        assert!(config.classifier.api_key.is_none());
        assert_eq!(config.classifier.model, DEFAULT_CLASSIFIER_MODEL);
        assert_eq!(config.classifier.timeout(), Duration::from_secs(10));
        assert_eq!(
            config.classifier.strictness,
            Strictness::PermissiveIfUnconfigured
        );
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_signing_secret() {
        clear_env();
        assert!(Config::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_classifier_settings() {
        clear_env();
        unsafe {
            env::set_var("TOKEN_SIGNING_SECRET", "secret");
            env::set_var("OPENAI_API_KEY", "  sk-test-key  ");
            env::set_var("CLASSIFIER_STRICTNESS", "strict");
            env::set_var("CLASSIFIER_TIMEOUT_SECS", "3");
            env::set_var("ALLOW_ANONYMOUS_LINKS", "true");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.classifier.api_key.as_deref(), Some("sk-test-key"));
        assert_eq!(config.classifier.strictness, Strictness::Strict);
        assert_eq!(config.classifier.timeout_secs, 3);
        assert!(config.allow_anonymous_links);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        unsafe {
            env::set_var("TOKEN_SIGNING_SECRET", "secret");
            env::set_var("CLASSIFIER_STRICTNESS", "lenient");
        }
        assert!(Config::from_env().is_err());

        unsafe {
            env::remove_var("CLASSIFIER_STRICTNESS");
            env::set_var("DB_MAX_CONNECTIONS", "many");
        }
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_empty_api_key_is_unconfigured() {
        clear_env();
        unsafe {
            env::set_var("TOKEN_SIGNING_SECRET", "secret");
            env::set_var("OPENAI_API_KEY", "");
        }

        assert!(Config::from_env().unwrap().classifier.api_key.is_none());

        clear_env();
    }
}
