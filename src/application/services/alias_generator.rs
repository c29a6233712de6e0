//! Alias generation for links created without a caller-supplied alias.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::classifier_service::{ContentClassifier, Purpose};
use crate::utils::alias::{generate_fallback_alias, sanitize_suggestion};

/// Produces candidate aliases for a destination URL.
///
/// Prefers a classifier-suggested alias that itself passes the alias safety
/// check. Any failure along the way yields a random fallback instead. The
/// result is not guaranteed to be free; the registry checks that.
pub struct AliasGenerator {
    classifier: Arc<ContentClassifier>,
}

impl AliasGenerator {
    pub fn new(classifier: Arc<ContentClassifier>) -> Self {
        Self { classifier }
    }

    /// Returns a suggested alias for `url`, or a random fallback.
    pub async fn generate(&self, url: &str) -> String {
        let Some(raw) = self.classifier.suggest_alias(url).await else {
            return generate_fallback_alias();
        };

        let Some(candidate) = sanitize_suggestion(&raw) else {
            debug!(suggestion = raw.trim(), "Suggestion is not a usable alias");
            return generate_fallback_alias();
        };

        if self
            .classifier
            .classify(&candidate, Purpose::Alias)
            .await
            .is_safe()
        {
            candidate
        } else {
            debug!(candidate, "Suggested alias rejected by classifier");
            generate_fallback_alias()
        }
    }

    /// A random alias that skips the suggestion service entirely.
    pub fn fallback(&self) -> String {
        generate_fallback_alias()
    }
}
