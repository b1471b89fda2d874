//! Placeholder resolution for stabilised units

use crate::annotation::Annotations;
use crate::checkpoint::StabilizationHandler;
use crate::content::{Document, Inline};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};
use wn_dict::CompiledMapping;

static PLACEHOLDER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:the\s|a\s)?placeholder").expect("valid placeholder regex")
});
static TRAILING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:the|a)\s*$").expect("valid article regex"));

/// Substitutes placeholder spans with dictionary translations
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderResolver<'m> {
    mapping: &'m CompiledMapping,
}

impl<'m> PlaceholderResolver<'m> {
    pub fn new(mapping: &'m CompiledMapping) -> Self {
        PlaceholderResolver { mapping }
    }

    /// Resolve every placeholder span of `unit`, returning the advanced term id counter.
    ///
    /// Spans whose text still carries the marker get each marker occurrence
    /// replaced by a [`Inline::Term`] with a fresh id and a comment popover.
    /// Spans the translator reworded are unwrapped in place. Afterwards a
    /// trailing article right before each new term is dropped and the unit
    /// is protected from further external mutation.
    pub fn resolve(
        &self,
        document: &mut Document,
        unit: usize,
        mut next_id: u64,
        annotations: &mut Annotations,
    ) -> u64 {
        let Some(target) = document.unit_mut(unit) else {
            warn!(unit, "resolve called for unknown unit");
            return next_id;
        };
        if target.protected {
            debug!(unit, "unit already resolved");
            return next_id;
        }

        let mut resolved = Vec::new();
        for node in flatten_fonts(std::mem::take(&mut target.nodes)) {
            match node {
                Inline::Placeholder { entry_id, children } => {
                    let text: String = children.iter().map(Inline::text_content).collect();
                    let entry = self.mapping.get(entry_id);
                    match entry.filter(|_| PLACEHOLDER_MARKER.is_match(&text)) {
                        Some(entry) => {
                            let mut last = 0;
                            for found in PLACEHOLDER_MARKER.find_iter(&text) {
                                resolved.push(Inline::text(&text[last..found.start()]));
                                resolved.push(Inline::Term {
                                    term_id: next_id,
                                    entry_id,
                                    text: entry.translation.clone(),
                                });
                                annotations.attach(next_id, entry_id, self.mapping);
                                next_id += 1;
                                last = found.end();
                            }
                            resolved.push(Inline::text(&text[last..]));
                        }
                        None => {
                            if entry.is_none() {
                                warn!(unit, entry_id, "placeholder for unknown entry, unwrapping");
                            } else {
                                debug!(unit, entry_id, text = %text, "marker lost in translation, unwrapping");
                            }
                            resolved.extend(children);
                        }
                    }
                }
                other => resolved.push(other),
            }
        }

        let mut nodes = merge_text(resolved);
        strip_articles(&mut nodes);
        target.nodes = nodes;
        target.protected = true;
        next_id
    }
}

/// Resolves units as the checkpoint tracker reports them stable
pub struct ResolvingHandler<'a> {
    pub resolver: PlaceholderResolver<'a>,
    pub document: &'a mut Document,
    pub annotations: &'a mut Annotations,
    pub next_id: &'a mut u64,
    pub resolved: &'a mut Vec<usize>,
}

impl StabilizationHandler for ResolvingHandler<'_> {
    fn on_unit_stable(&mut self, unit: usize) {
        *self.next_id = self
            .resolver
            .resolve(self.document, unit, *self.next_id, self.annotations);
        self.resolved.push(unit);
    }
}

/// Replace every font wrapper with its children, at any depth
fn flatten_fonts(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Inline::Font { children } => out.extend(flatten_fonts(children)),
            Inline::Placeholder { entry_id, children } => out.push(Inline::Placeholder {
                entry_id,
                children: flatten_fonts(children),
            }),
            other => out.push(other),
        }
    }
    out
}

/// Join adjacent text nodes and drop empty ones
fn merge_text(nodes: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let Inline::Text { text } = &node {
            if text.is_empty() {
                continue;
            }
            if let Some(Inline::Text { text: prev }) = out.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// Remove a trailing "the"/"a" from the text right before each term
fn strip_articles(nodes: &mut Vec<Inline>) {
    for i in 1..nodes.len() {
        if !matches!(nodes[i], Inline::Term { .. }) {
            continue;
        }
        if let Inline::Text { text } = &mut nodes[i - 1] {
            if let Some(found) = TRAILING_ARTICLE.find(text) {
                text.truncate(found.start());
            }
        }
    }
    nodes.retain(|node| !matches!(node, Inline::Text { text } if text.is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wn_dict::MappedEntry;

    fn mapping() -> CompiledMapping {
        CompiledMapping::new()
            .with_entry(7, MappedEntry::new("Elder", None))
            .with_entry(8, MappedEntry::new("fountain pen", Some("a writing tool".to_string())))
    }

    fn placeholder(entry_id: u32, text: &str) -> Inline {
        Inline::Placeholder {
            entry_id,
            children: vec![Inline::text(text)],
        }
    }

    fn resolve_line(nodes: Vec<Inline>) -> (Document, Annotations, u64) {
        let mapping = mapping();
        let mut document = Document::new(vec![nodes]);
        let mut annotations = Annotations::new();
        let next = PlaceholderResolver::new(&mapping).resolve(&mut document, 0, 1, &mut annotations);
        (document, annotations, next)
    }

    #[test]
    fn test_article_consumed_with_marker() {
        let (document, annotations, next) = resolve_line(vec![placeholder(7, "a Placeholder approached")]);
        let unit = &document.units[0];
        assert_eq!(unit.text(), "Elder approached");
        assert_eq!(
            unit.nodes,
            vec![
                Inline::Term { term_id: 1, entry_id: 7, text: "Elder".to_string() },
                Inline::text(" approached"),
            ]
        );
        assert_eq!(next, 2);
        assert_eq!(annotations.get(1).unwrap().content, "No comment");
        assert!(unit.protected);
    }

    #[test]
    fn test_no_residual_marker() {
        for marker in ["placeholder", "PLACEHOLDER", "the placeholder", "The Placeholder"] {
            let (document, _, _) = resolve_line(vec![
                Inline::text("He held "),
                placeholder(8, marker),
                Inline::text("."),
            ]);
            let text = document.units[0].text();
            assert_eq!(text, "He held fountain pen.", "marker {:?}", marker);
            assert!(!text.to_lowercase().contains("placeholder"));
        }
    }

    #[test]
    fn test_every_marker_in_span_gets_fresh_id() {
        let (document, annotations, next) =
            resolve_line(vec![placeholder(7, "placeholder and placeholder")]);
        assert_eq!(document.units[0].text(), "Elder and Elder");
        assert_eq!(next, 3);
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations.get(2).unwrap().entry_id, 7);
    }

    #[test]
    fn test_reworded_span_is_unwrapped() {
        let (document, annotations, next) = resolve_line(vec![
            Inline::text("He met "),
            placeholder(7, "the stand-in"),
            Inline::text(" today"),
        ]);
        assert_eq!(document.units[0].nodes, vec![Inline::text("He met the stand-in today")]);
        assert_eq!(next, 1);
        assert!(annotations.is_empty());
        assert!(document.units[0].protected);
    }

    #[test]
    fn test_unknown_entry_is_unwrapped() {
        let (document, annotations, _) = resolve_line(vec![placeholder(99, "placeholder")]);
        assert_eq!(document.units[0].nodes, vec![Inline::text("placeholder")]);
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_trailing_the_removed() {
        let (document, _, _) = resolve_line(vec![Inline::text("He met the "), placeholder(7, "placeholder")]);
        assert_eq!(document.units[0].text(), "He met Elder");
    }

    #[test]
    fn test_article_not_trailing_is_kept() {
        let (document, _, _) = resolve_line(vec![Inline::text("the red "), placeholder(7, "placeholder")]);
        assert_eq!(document.units[0].text(), "the red Elder");

        // Article-like endings of longer words are not articles
        let (document, _, _) = resolve_line(vec![Inline::text("bathe "), placeholder(7, "placeholder")]);
        assert_eq!(document.units[0].text(), "bathe Elder");
        let (document, _, _) = resolve_line(vec![Inline::text("Santa "), placeholder(7, "placeholder")]);
        assert_eq!(document.units[0].text(), "Santa Elder");
    }

    #[test]
    fn test_only_trailing_article_removed() {
        let (document, _, _) = resolve_line(vec![
            Inline::text("The man saw a "),
            placeholder(8, "placeholder"),
        ]);
        assert_eq!(document.units[0].text(), "The man saw fountain pen");
    }

    #[test]
    fn test_font_wrappers_flattened() {
        let (document, _, _) = resolve_line(vec![
            Inline::font(vec![Inline::text("He met the ")]),
            Inline::Placeholder {
                entry_id: 7,
                children: vec![Inline::font(vec![Inline::text("PLACEHOLDER")])],
            },
            Inline::font(vec![Inline::font(vec![Inline::text("!")])]),
        ]);
        assert_eq!(
            document.units[0].nodes,
            vec![
                Inline::text("He met "),
                Inline::Term { term_id: 1, entry_id: 7, text: "Elder".to_string() },
                Inline::text("!"),
            ]
        );
    }

    #[test]
    fn test_resolve_twice_is_noop() {
        let mapping = mapping();
        let mut document = Document::new(vec![vec![placeholder(7, "placeholder")]]);
        let mut annotations = Annotations::new();
        let resolver = PlaceholderResolver::new(&mapping);
        let next = resolver.resolve(&mut document, 0, 10, &mut annotations);
        assert_eq!(next, 11);
        let snapshot = document.clone();
        assert_eq!(resolver.resolve(&mut document, 0, next, &mut annotations), 11);
        assert_eq!(document, snapshot);
        assert_eq!(resolver.resolve(&mut document, 5, next, &mut annotations), 11);
    }

    #[test]
    fn test_merge_text() {
        let merged = merge_text(vec![
            Inline::text("a"),
            Inline::text(""),
            Inline::text("b"),
            Inline::Term { term_id: 1, entry_id: 1, text: "x".to_string() },
            Inline::text("c"),
        ]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], Inline::text("ab"));
    }
}
