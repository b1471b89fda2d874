//! Mock machine translator for testing
//!
//! Deterministic, API-free stand-in for the external page translator. Each
//! mode reproduces one way a real translator treats a placeholder span:
//! leaving the marker alone, changing its case, or rewording it away.
//!
//! # Example
//!
//! ```ignore
//! use wn_dict_mt::{MachineTranslator, MockMode, MockTranslator};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockTranslator::new(MockMode::Reword("stand-in".into()));
//!     let result = mock.translate("the placeholder", "ja", "en").await.unwrap();
//!     assert_eq!(result, "the stand-in");
//! }
//! ```

use crate::error::{MtError, MtResult};
use crate::translator::MachineTranslator;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)placeholder").expect("valid marker regex"));

/// Mock translation modes for testing different scenarios
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Predefined translations keyed by `(text, target_locale)`.
    /// Texts without a mapping come back unchanged.
    Mappings(HashMap<(String, String), String>),

    /// Upper-case everything, as a translator that keeps the marker but not its case
    Uppercase,

    /// Replace the placeholder marker with another word, simulating a
    /// translator that rewrote the span
    Reword(String),

    /// Simulate provider errors
    Error(String),

    /// No-op: return input unchanged
    NoOp,
}

/// Mock translator that simulates various translation scenarios
#[derive(Debug, Clone)]
pub struct MockTranslator {
    mode: MockMode,
    /// Optional simulated network delay (in milliseconds)
    delay_ms: u64,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self { mode, delay_ms: 0 }
    }

    /// Create a MockTranslator with simulated latency per request
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self { mode, delay_ms }
    }

    /// Build a `Mappings` translator from `(source, translation)` pairs for one target
    pub fn from_pairs<'a>(
        target_locale: &str,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let map = pairs
            .into_iter()
            .map(|(text, translation)| {
                (
                    (text.to_string(), target_locale.to_string()),
                    translation.to_string(),
                )
            })
            .collect();
        Self::new(MockMode::Mappings(map))
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, text: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Mappings(map) => {
                let key = (text.to_string(), target.to_string());
                Ok(map.get(&key).cloned().unwrap_or_else(|| text.to_string()))
            }
            MockMode::Uppercase => Ok(text.to_uppercase()),
            MockMode::Reword(word) => Ok(MARKER.replace_all(text, word.as_str()).into_owned()),
            MockMode::Error(msg) => Err(MtError::TranslationError(msg.clone())),
            MockMode::NoOp => Ok(text.to_string()),
        }
    }
}

#[async_trait]
impl MachineTranslator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String> {
        self.apply_delay().await;
        self.apply_translation(text, target_locale)
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        // One delay per batch, not per string
        self.apply_delay().await;
        texts
            .iter()
            .map(|text| self.apply_translation(text, target_locale))
            .collect()
    }

    fn provider_name(&self) -> &str {
        "Mock Translator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_mappings_with_fallback() {
        let mock = MockTranslator::from_pairs("en", [("彼は笑った", "He laughed")]);
        assert_eq!(mock.translate("彼は笑った", "ja", "en").await.unwrap(), "He laughed");
        assert_eq!(mock.translate("placeholder", "ja", "en").await.unwrap(), "placeholder");
        // Mapped for "en" only
        assert_eq!(mock.translate("彼は笑った", "ja", "fr").await.unwrap(), "彼は笑った");
    }

    #[tokio::test]
    async fn test_uppercase_keeps_marker_detectable() {
        let mock = MockTranslator::new(MockMode::Uppercase);
        let result = mock.translate("the placeholder", "ja", "en").await.unwrap();
        assert_eq!(result, "THE PLACEHOLDER");
        assert!(result.to_lowercase().contains("placeholder"));
    }

    #[tokio::test]
    async fn test_reword_removes_marker() {
        let mock = MockTranslator::new(MockMode::Reword("stand-in".to_string()));
        let texts = vec!["a Placeholder".to_string(), "plain".to_string()];
        let results = mock.translate_batch(&texts, "ja", "en").await.unwrap();
        assert_eq!(results, vec!["a stand-in", "plain"]);
    }

    #[tokio::test]
    async fn test_error_mode() {
        let mock = MockTranslator::new(MockMode::Error("quota exceeded".to_string()));
        let result = mock.translate("text", "ja", "en").await;
        assert_eq!(
            result,
            Err(MtError::TranslationError("quota exceeded".to_string()))
        );

        let texts = vec!["a".to_string(), "b".to_string()];
        assert!(mock.translate_batch(&texts, "ja", "en").await.is_err());
    }

    #[tokio::test]
    async fn test_noop_and_provider_name() {
        let mock = MockTranslator::new(MockMode::NoOp);
        assert_eq!(mock.translate("unchanged", "ja", "en").await.unwrap(), "unchanged");
        assert_eq!(mock.provider_name(), "Mock Translator");
    }

    #[tokio::test]
    async fn test_delay_applies_once_per_batch() {
        let mock = MockTranslator::with_delay(MockMode::NoOp, 20);
        let texts: Vec<String> = (0..5).map(|i| i.to_string()).collect();
        let start = Instant::now();
        mock.translate_batch(&texts, "ja", "en").await.unwrap();
        let elapsed = start.elapsed().as_millis();
        assert!(elapsed >= 20, "Expected >=20ms, got {}ms", elapsed);
        assert!(elapsed < 100, "Expected a single delay, got {}ms", elapsed);
    }
}
