//! Content-safety classification of URLs and aliases.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::completion::{CompletionClient, CompletionRequest};

/// Inputs longer than this are cut before being sent to the classifier.
const MAX_CLASSIFIED_LEN: usize = 2048;

const URL_SYSTEM_PROMPT: &str = "You are a very strict content filter protecting minors. \
You flag anything related to alcohol, drugs, sex or pornography, including brand names \
and subtle references. Answer ONLY with SAFE or UNSAFE, nothing else.";

const ALIAS_SYSTEM_PROMPT: &str = "You are a strict content filter protecting minors. \
You flag short link aliases that refer to alcohol, drugs, sex or pornography. \
Answer ONLY with SAFE or UNSAFE.";

const SUGGEST_SYSTEM_PROMPT: &str = "You generate aliases for short links. Aliases are short, \
simple and suitable for all ages. Never reference alcohol, drugs or sex.";

/// What is being classified; selects the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Url,
    Alias,
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purpose::Url => write!(f, "url"),
            Purpose::Alias => write!(f, "alias"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
}

impl Verdict {
    pub fn is_safe(self) -> bool {
        self == Verdict::Safe
    }
}

/// Verdict used when no classifier credential is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unconfigured means everything is rejected.
    Strict,
    /// Unconfigured means everything is accepted.
    #[default]
    PermissiveIfUnconfigured,
}

impl FromStr for Strictness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Strictness::Strict),
            "permissive" | "permissive-if-unconfigured" => Ok(Strictness::PermissiveIfUnconfigured),
            other => Err(format!(
                "unknown strictness '{other}', expected 'strict' or 'permissive'"
            )),
        }
    }
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Strict => write!(f, "strict"),
            Strictness::PermissiveIfUnconfigured => write!(f, "permissive"),
        }
    }
}

/// Extracts a verdict from a free-form classifier answer.
///
/// Case-insensitive and whitespace-tolerant; only an answer starting with
/// `SAFE` counts as safe.
pub fn parse_verdict(answer: &str) -> Verdict {
    if answer.trim().to_ascii_uppercase().starts_with("SAFE") {
        Verdict::Safe
    } else {
        Verdict::Unsafe
    }
}

fn clip(text: &str) -> &str {
    if text.len() <= MAX_CLASSIFIED_LEN {
        return text;
    }
    let mut end = MAX_CLASSIFIED_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Single-shot safety oracle in front of a [`CompletionClient`].
///
/// # Policy
///
/// - No client configured: verdict follows [`Strictness`]
/// - Client error, timeout or empty answer: [`Verdict::Unsafe`]
/// - One request per check, never retried
pub struct ContentClassifier {
    client: Option<Arc<dyn CompletionClient>>,
    strictness: Strictness,
}

impl ContentClassifier {
    pub fn new(client: Option<Arc<dyn CompletionClient>>, strictness: Strictness) -> Self {
        Self { client, strictness }
    }

    /// A classifier with no backing service.
    pub fn unconfigured(strictness: Strictness) -> Self {
        Self::new(None, strictness)
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Name of the backing client, if any.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.client.as_ref().map(|c| c.name())
    }

    /// Labels `text` as safe or unsafe for the given purpose.
    pub async fn classify(&self, text: &str, purpose: Purpose) -> Verdict {
        let Some(client) = &self.client else {
            let verdict = match self.strictness {
                Strictness::Strict => Verdict::Unsafe,
                Strictness::PermissiveIfUnconfigured => Verdict::Safe,
            };
            debug!(%purpose, ?verdict, "Classifier not configured, using policy verdict");
            return verdict;
        };

        let request = match purpose {
            Purpose::Url => CompletionRequest {
                system_prompt: URL_SYSTEM_PROMPT.to_string(),
                user_prompt: format!(
                    "Analyze this URL and answer ONLY with SAFE or UNSAFE. Mark it UNSAFE if it \
                     references alcohol, drugs, sexual content or anything unsuitable for minors. \
                     Be very strict. URL: {}",
                    clip(text)
                ),
                max_tokens: 10,
                temperature: 0.0,
            },
            Purpose::Alias => CompletionRequest {
                system_prompt: ALIAS_SYSTEM_PROMPT.to_string(),
                user_prompt: format!(
                    "Analyze this alias and answer ONLY with SAFE or UNSAFE. Mark it UNSAFE if it \
                     references alcohol, drugs, sexual content or anything unsuitable for minors. \
                     Alias: {}",
                    clip(text)
                ),
                max_tokens: 10,
                temperature: 0.0,
            },
        };

        match client.complete(request).await {
            Ok(answer) => {
                let verdict = parse_verdict(&answer);
                debug!(%purpose, answer = answer.trim(), ?verdict, "Classifier answered");
                verdict
            }
            Err(e) => {
                warn!(%purpose, error = %e, "Classifier call failed, rejecting");
                Verdict::Unsafe
            }
        }
    }

    /// Asks the completion service for a short alias for `url`.
    ///
    /// Returns the raw answer, or `None` when unconfigured or on any error.
    /// The answer is not validated or classified here.
    pub async fn suggest_alias(&self, url: &str) -> Option<String> {
        let client = self.client.as_ref()?;

        let request = CompletionRequest {
            system_prompt: SUGGEST_SYSTEM_PROMPT.to_string(),
            user_prompt: format!(
                "Suggest a short (3-8 characters), simple and memorable alias for this URL. \
                 Answer ONLY with the alias, no explanation. URL: {}",
                clip(url)
            ),
            max_tokens: 15,
            temperature: 0.3,
        };

        match client.complete(request).await {
            Ok(answer) if !answer.trim().is_empty() => {
                debug!(suggestion = answer.trim(), "Classifier suggested alias");
                Some(answer)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Alias suggestion failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::completion::{CompletionError, MockCompletionClient};

    fn classifier_answering(answer: &'static str) -> ContentClassifier {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(move |_| Ok(answer.to_string()));
        ContentClassifier::new(Some(Arc::new(mock)), Strictness::Strict)
    }

    #[test]
    fn test_parse_verdict() {
        assert_eq!(parse_verdict("SAFE"), Verdict::Safe);
        assert_eq!(parse_verdict("  safe\n"), Verdict::Safe);
        assert_eq!(parse_verdict("Safe."), Verdict::Safe);
        assert_eq!(parse_verdict("UNSAFE"), Verdict::Unsafe);
        assert_eq!(parse_verdict("unsafe"), Verdict::Unsafe);
        assert_eq!(parse_verdict(""), Verdict::Unsafe);
        assert_eq!(parse_verdict("I think it is SAFE"), Verdict::Unsafe);
    }

    #[test]
    fn test_strictness_from_str() {
        assert_eq!("strict".parse::<Strictness>(), Ok(Strictness::Strict));
        assert_eq!(
            "Permissive".parse::<Strictness>(),
            Ok(Strictness::PermissiveIfUnconfigured)
        );
        assert!("lenient".parse::<Strictness>().is_err());
    }

    #[test]
    fn test_clip_respects_char_boundaries() {
        let text = "é".repeat(MAX_CLASSIFIED_LEN);
        let clipped = clip(&text);

        assert!(clipped.len() <= MAX_CLASSIFIED_LEN);
        assert!(text.starts_with(clipped));
    }

    #[tokio::test]
    async fn test_unconfigured_permissive_is_safe() {
        let classifier = ContentClassifier::unconfigured(Strictness::PermissiveIfUnconfigured);

        assert_eq!(
            classifier.classify("https://example.com", Purpose::Url).await,
            Verdict::Safe
        );
        assert!(classifier.backend_name().is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_strict_is_unsafe() {
        let classifier = ContentClassifier::unconfigured(Strictness::Strict);

        assert_eq!(
            classifier.classify("https://example.com", Purpose::Url).await,
            Verdict::Unsafe
        );
    }

    #[tokio::test]
    async fn test_safe_answer() {
        let classifier = classifier_answering(" safe ");
        assert_eq!(
            classifier.classify("https://example.com", Purpose::Url).await,
            Verdict::Safe
        );
    }

    #[tokio::test]
    async fn test_unsafe_answer() {
        let classifier = classifier_answering("UNSAFE");
        assert_eq!(
            classifier.classify("beer-deals", Purpose::Alias).await,
            Verdict::Unsafe
        );
    }

    #[tokio::test]
    async fn test_error_fails_closed_even_when_permissive() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(CompletionError::Timeout));
        let classifier =
            ContentClassifier::new(Some(Arc::new(mock)), Strictness::PermissiveIfUnconfigured);

        assert_eq!(
            classifier.classify("https://example.com", Purpose::Url).await,
            Verdict::Unsafe
        );
    }

    #[tokio::test]
    async fn test_purpose_selects_prompt() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| {
                req.system_prompt == ALIAS_SYSTEM_PROMPT
                    && req.user_prompt.ends_with("Alias: promo")
                    && req.max_tokens == 10
            })
            .times(1)
            .returning(|_| Ok("SAFE".to_string()));
        let classifier = ContentClassifier::new(Some(Arc::new(mock)), Strictness::Strict);

        assert!(classifier.classify("promo", Purpose::Alias).await.is_safe());
    }

    #[tokio::test]
    async fn test_suggest_alias_unconfigured() {
        let classifier = ContentClassifier::unconfigured(Strictness::PermissiveIfUnconfigured);
        assert_eq!(classifier.suggest_alias("https://example.com").await, None);
    }

    #[tokio::test]
    async fn test_suggest_alias_error_is_none() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(CompletionError::Status(500)));
        let classifier = ContentClassifier::new(Some(Arc::new(mock)), Strictness::Strict);

        assert_eq!(classifier.suggest_alias("https://example.com").await, None);
    }

    #[tokio::test]
    async fn test_suggest_alias_returns_answer() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete()
            .withf(|req| req.system_prompt == SUGGEST_SYSTEM_PROMPT && req.max_tokens == 15)
            .times(1)
            .returning(|_| Ok("rustlang\n".to_string()));
        let classifier = ContentClassifier::new(Some(Arc::new(mock)), Strictness::Strict);

        assert_eq!(
            classifier.suggest_alias("https://rust-lang.org").await,
            Some("rustlang\n".to_string())
        );
    }
}
