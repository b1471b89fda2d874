//! Replace dictionary terms in source lines with placeholder spans

use crate::content::{Document, Inline};
use tracing::debug;
use wn_dict::Dictionary;

/// Split a source line into text and placeholder spans.
///
/// The line is scanned left to right as plain text; at each position the
/// first matching entry wins. Entries are ordered longest raw term first,
/// so a longer term is never split by one of its substrings.
pub fn tag_line(line: &str, dictionary: &Dictionary) -> Vec<Inline> {
    let terms: Vec<(u32, &str)> = dictionary
        .iter_with_ids()
        .map(|(id, entry)| (id, entry.raw.as_str()))
        .filter(|(_, raw)| !raw.is_empty())
        .collect();

    let mut nodes = Vec::new();
    let mut pending = String::new();
    let mut rest = line;

    while let Some(c) = rest.chars().next() {
        match terms.iter().find(|(_, raw)| rest.starts_with(raw)) {
            Some(&(id, raw)) => {
                if !pending.is_empty() {
                    nodes.push(Inline::text(std::mem::take(&mut pending)));
                }
                debug!(entry_id = id, term = raw, "tagged term");
                nodes.push(Inline::placeholder(id));
                rest = &rest[raw.len()..];
            }
            None => {
                pending.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    if !pending.is_empty() {
        nodes.push(Inline::text(pending));
    }
    nodes
}

/// Tag every line of a chapter, one unit per line
pub fn tag_document(source: &str, dictionary: &Dictionary) -> Document {
    Document::new(
        source
            .lines()
            .map(|line| tag_line(line, dictionary))
            .collect(),
    )
}
