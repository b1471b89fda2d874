//! Compiler configuration
//!
//! Configuration is plain JSON so it can live next to the dictionary files:
//!
//! ```json
//! {
//!     "language": "jp",
//!     "comment_max_len": 100,
//!     "honorifics": [
//!         { "lang": "jp", "raw": "さん", "trans": "san", "affix": "suffix", "with_dash": true }
//!     ]
//! }
//! ```
//!
//! Every field is optional; missing fields take the defaults below.

use serde::{Deserialize, Serialize};

/// Comments longer than this are truncated
pub const COMMENT_MAX_LEN: usize = 100;

/// Tokens commonly found between first and last names in raw chapters
pub const NAME_SEPARATORS: [&str; 4] = ["", " ", "・", "＝"];

/// Source language of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "ja")]
    Jp,
    #[serde(alias = "zh")]
    Cn,
    #[serde(alias = "ko")]
    Kr,
}

/// Where an honorific attaches to a translated name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HonorificAffix {
    Prefix,
    Suffix,
}

/// An honorific used to derive extra name variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Honorific {
    pub lang: Language,
    /// Honorific as it appears in the raw text, e.g. `さん`
    pub raw: String,
    /// Honorific as it should appear in the translation, e.g. `san`
    pub trans: String,
    pub affix: HonorificAffix,
    /// Join a suffix with `-` instead of a space (`Naruto-san`)
    #[serde(default)]
    pub with_dash: bool,
    /// Also translate the honorific on its own, outside of names
    #[serde(default)]
    pub standalone: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Honorific {
    /// Apply this honorific to a translated name
    pub fn decorate(&self, name: &str) -> String {
        match self.affix {
            HonorificAffix::Suffix => {
                let joiner = if self.with_dash { "-" } else { " " };
                format!("{}{}{}", name, joiner, self.trans)
            }
            HonorificAffix::Prefix => format!("{} {}", self.trans, name),
        }
    }
}

/// Settings that influence how dictionary files are compiled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub language: Language,
    pub comment_max_len: usize,
    pub name_separators: Vec<String>,
    pub honorifics: Vec<Honorific>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            language: Language::default(),
            comment_max_len: COMMENT_MAX_LEN,
            name_separators: NAME_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            honorifics: Vec::new(),
        }
    }
}

impl CompilerConfig {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_honorific(mut self, honorific: Honorific) -> Self {
        self.honorifics.push(honorific);
        self
    }

    /// Enabled honorifics for the configured language
    pub fn active_honorifics(&self) -> impl Iterator<Item = &Honorific> {
        self.honorifics
            .iter()
            .filter(|h| h.enabled && h.lang == self.language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.comment_max_len, 100);
        assert_eq!(config.name_separators, vec!["", " ", "・", "＝"]);
        assert_eq!(config.language, Language::Jp);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "language": "cn",
            "honorifics": [
                { "lang": "jp", "raw": "さん", "trans": "san", "affix": "suffix", "with_dash": true }
            ]
        }"#;
        let config: CompilerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.language, Language::Cn);
        assert_eq!(config.comment_max_len, 100);
        assert_eq!(config.honorifics.len(), 1);
        assert!(config.honorifics[0].enabled);
        assert!(!config.honorifics[0].standalone);
        // Honorific is for another language
        assert_eq!(config.active_honorifics().count(), 0);
    }

    #[test]
    fn test_decorate() {
        let mut honorific = Honorific {
            lang: Language::Jp,
            raw: "さん".to_string(),
            trans: "san".to_string(),
            affix: HonorificAffix::Suffix,
            with_dash: true,
            standalone: false,
            enabled: true,
        };
        assert_eq!(honorific.decorate("Naruto"), "Naruto-san");
        honorific.with_dash = false;
        assert_eq!(honorific.decorate("Naruto"), "Naruto san");
        honorific.affix = HonorificAffix::Prefix;
        honorific.trans = "Lord".to_string();
        assert_eq!(honorific.decorate("Naruto"), "Lord Naruto");
    }
}
