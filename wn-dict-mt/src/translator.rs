//! Machine translation provider trait
//!
//! The page translator is a third-party process this crate cannot control.
//! [`MachineTranslator`] is the seam through which the simulated external
//! process ([`crate::external`]) rewrites content text, so the whole
//! stabilisation pipeline can run headlessly with a
//! [`crate::mock::MockTranslator`] or any real provider.
//!
//! # Example
//!
//! ```ignore
//! use wn_dict_mt::{MachineTranslator, MockMode, MockTranslator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = MockTranslator::new(MockMode::Uppercase);
//!     let result = provider.translate("the placeholder smiled", "ja", "en").await?;
//!     assert_eq!(result, "THE PLACEHOLDER SMILED");
//!     Ok(())
//! }
//! ```

use crate::error::{MtError, MtResult};
use async_trait::async_trait;

/// A machine translation backend
///
/// Implementations may reword, reorder or restructure the text they are
/// given; callers must not assume any part of the input survives verbatim.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Translate a single text node from source to target locale
    ///
    /// # Arguments
    ///
    /// * `text` - The text to translate
    /// * `source_locale` - Source language code (e.g., "ja", "zh-Hans")
    /// * `target_locale` - Target language code (e.g., "en")
    async fn translate(
        &self,
        text: &str,
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<String>;

    /// Translate several text nodes of one unit together
    ///
    /// Output order and length match the input. The default translates the
    /// texts one by one; providers with per-request overhead should override.
    async fn translate_batch(
        &self,
        texts: &[String],
        source_locale: &str,
        target_locale: &str,
    ) -> MtResult<Vec<String>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, source_locale, target_locale).await?);
        }
        Ok(results)
    }

    /// Name of this provider, for logging
    fn provider_name(&self) -> &str;
}

/// Normalize a locale code by stripping region and script information
///
/// `zh-Hans` → `zh`, `ja-JP` → `ja`, `EN` → `en`.
pub fn normalize_locale(locale: &str) -> String {
    locale.split(['-', '_']).next().unwrap_or(locale).to_lowercase()
}

/// Validate that a locale code only contains alphanumerics, `-` and `_`
pub fn validate_locale(locale: &str) -> MtResult<()> {
    if locale.is_empty() {
        return Err(MtError::InvalidLocale("Locale code is empty".to_string()));
    }
    if !locale
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(MtError::InvalidLocale(format!(
            "Invalid characters in locale code: {}",
            locale
        )));
    }
    Ok(())
}
