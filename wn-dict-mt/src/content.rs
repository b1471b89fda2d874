//! Headless model of the rendered chapter content
//!
//! A [`Document`] is a sequence of [`Unit`]s, one per content line. Between
//! every pair of consecutive units (and at both ends) sits a boundary marker,
//! so a document of `n` units has `n + 1` markers and unit `L` is bounded by
//! markers `L` and `L + 1`.

use crate::error::{MtError, MtResult};
use serde::Serialize;
use wn_dict::compiler::html_escape;

/// Text shown inside a placeholder span before translation
pub const PLACEHOLDER_TEXT: &str = "placeholder";

/// An inline content node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Inline {
    Text { text: String },
    /// Span awaiting substitution with the dictionary entry `entry_id`
    Placeholder { entry_id: u32, children: Vec<Inline> },
    /// A resolved dictionary term. Never touched by the translator again.
    Term {
        term_id: u64,
        entry_id: u32,
        text: String,
    },
    /// Wrapper the external translator puts around text it rewrote
    Font { children: Vec<Inline> },
}

impl Inline {
    pub fn text(text: impl Into<String>) -> Self {
        Inline::Text { text: text.into() }
    }

    /// A fresh placeholder span for a dictionary entry
    pub fn placeholder(entry_id: u32) -> Self {
        Inline::Placeholder {
            entry_id,
            children: vec![Inline::text(PLACEHOLDER_TEXT)],
        }
    }

    pub fn font(children: Vec<Inline>) -> Self {
        Inline::Font { children }
    }

    /// Concatenated visible text of this node and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Inline::Text { text } | Inline::Term { text, .. } => out.push_str(text),
            Inline::Placeholder { children, .. } | Inline::Font { children } => {
                for child in children {
                    child.push_text(out);
                }
            }
        }
    }

    /// Markup for this node. Text is escaped here and nowhere earlier.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.push_html(&mut out);
        out
    }

    fn push_html(&self, out: &mut String) {
        match self {
            Inline::Text { text } => out.push_str(&html_escape(text)),
            Inline::Placeholder { entry_id, children } => {
                out.push_str(&format!("<span class='placeholder' id='p{}'>", entry_id));
                for child in children {
                    child.push_html(out);
                }
                out.push_str("</span>");
            }
            Inline::Term { term_id, text, .. } => {
                out.push_str(&format!(
                    "<a class='notranslate word' id='w{}'>{}</a>",
                    term_id,
                    html_escape(text)
                ));
            }
            Inline::Font { children } => {
                out.push_str("<font>");
                for child in children {
                    child.push_html(out);
                }
                out.push_str("</font>");
            }
        }
    }
}

/// Visible text of a node list
pub fn nodes_text(nodes: &[Inline]) -> String {
    nodes.iter().map(Inline::text_content).collect()
}

/// One logical line of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub id: usize,
    pub nodes: Vec<Inline>,
    /// Set once placeholders are resolved; later external mutations are refused
    pub protected: bool,
}

impl Unit {
    pub fn text(&self) -> String {
        nodes_text(&self.nodes)
    }

    pub fn to_html(&self) -> String {
        self.nodes.iter().map(Inline::to_html).collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Inline::Placeholder { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub units: Vec<Unit>,
}

impl Document {
    /// Build a document from the node lists of each line, in order
    pub fn new(lines: Vec<Vec<Inline>>) -> Self {
        let units = lines
            .into_iter()
            .enumerate()
            .map(|(id, nodes)| Unit {
                id,
                nodes,
                protected: false,
            })
            .collect();
        Document { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Number of boundary markers interleaved with the units
    pub fn marker_count(&self) -> usize {
        self.units.len() + 1
    }

    pub fn unit(&self, id: usize) -> Option<&Unit> {
        self.units.get(id)
    }

    pub fn unit_mut(&mut self, id: usize) -> Option<&mut Unit> {
        self.units.get_mut(id)
    }

    /// Current node lists of every unit, as seen by the external translator
    pub fn snapshot(&self) -> Vec<Vec<Inline>> {
        self.units.iter().map(|unit| unit.nodes.clone()).collect()
    }

    /// Replace a unit's content with what the external translator produced.
    ///
    /// Returns `Ok(false)` without touching anything when the unit is protected.
    pub fn apply_mutation(&mut self, unit: usize, nodes: Vec<Inline>) -> MtResult<bool> {
        let target = self.units.get_mut(unit).ok_or(MtError::UnknownUnit(unit))?;
        if target.protected {
            return Ok(false);
        }
        target.nodes = nodes;
        Ok(true)
    }

    /// Visible text, one line per unit
    pub fn text(&self) -> String {
        self.units
            .iter()
            .map(Unit::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Rendered markup, one paragraph per unit
    pub fn to_html(&self) -> String {
        self.units
            .iter()
            .map(|unit| format!("<p>{}</p>", unit.to_html()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
