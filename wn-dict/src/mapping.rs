use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rendered when a definition has no comment
pub const NO_COMMENT: &str = "No comment";

/// Translation and comment of one dictionary definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedEntry {
    pub translation: String,
    pub comment: Option<String>,
}

impl MappedEntry {
    pub fn new(translation: impl Into<String>, comment: Option<String>) -> Self {
        MappedEntry {
            translation: translation.into(),
            comment,
        }
    }

    /// Comment text for display; never blank
    pub fn display_comment(&self) -> &str {
        match self.comment.as_deref() {
            Some(comment) if !comment.trim().is_empty() && comment != "None" => comment,
            _ => NO_COMMENT,
        }
    }
}

/// The compiled dictionary as seen by the runtime: definition id → entry.
///
/// Ids are assigned by whoever renders placeholders into content and have
/// no relation to line numbers in the dictionary source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompiledMapping(pub BTreeMap<u32, MappedEntry>);

impl CompiledMapping {
    pub fn new() -> Self {
        CompiledMapping(BTreeMap::new())
    }

    pub fn with_entry(mut self, id: u32, entry: MappedEntry) -> Self {
        self.0.insert(id, entry);
        self
    }

    pub fn insert(&mut self, id: u32, entry: MappedEntry) {
        self.0.insert(id, entry);
    }

    pub fn get(&self, id: u32) -> Option<&MappedEntry> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_comment_fallback() {
        assert_eq!(MappedEntry::new("Elder", None).display_comment(), "No comment");
        assert_eq!(
            MappedEntry::new("Elder", Some("  ".to_string())).display_comment(),
            "No comment"
        );
        assert_eq!(
            MappedEntry::new("Elder", Some("None".to_string())).display_comment(),
            "No comment"
        );
        assert_eq!(
            MappedEntry::new("Elder", Some("village head".to_string())).display_comment(),
            "village head"
        );
    }

    #[test]
    fn test_mapping_json_shape() {
        let mapping = CompiledMapping::new().with_entry(7, MappedEntry::new("Elder", None));
        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(json, r#"{"7":{"translation":"Elder","comment":null}}"#);
        let back: CompiledMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(7).unwrap().translation, "Elder");
    }
}
