//! Comment popovers attached to resolved terms

use serde::Serialize;
use std::collections::BTreeMap;
use wn_dict::{CompiledMapping, NO_COMMENT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
}

/// A lazily shown comment bound to one resolved term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popover {
    pub term_id: u64,
    pub entry_id: u32,
    pub content: String,
    pub trigger: Trigger,
    pub placement: Placement,
}

/// Popover bindings keyed by term id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Annotations {
    popovers: BTreeMap<u64, Popover>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the comment of dictionary entry `entry_id` to `term_id`.
    ///
    /// Only the first call for a term id registers anything; later calls
    /// return `false` and leave the existing binding alone.
    pub fn attach(&mut self, term_id: u64, entry_id: u32, mapping: &CompiledMapping) -> bool {
        if self.popovers.contains_key(&term_id) {
            return false;
        }
        let content = mapping
            .get(entry_id)
            .map(|entry| entry.display_comment())
            .unwrap_or(NO_COMMENT)
            .to_string();
        self.popovers.insert(
            term_id,
            Popover {
                term_id,
                entry_id,
                content,
                trigger: Trigger::Focus,
                placement: Placement::Top,
            },
        );
        true
    }

    pub fn get(&self, term_id: u64) -> Option<&Popover> {
        self.popovers.get(&term_id)
    }

    pub fn len(&self) -> usize {
        self.popovers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popovers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popover> {
        self.popovers.values()
    }
}
