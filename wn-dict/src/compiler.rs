//! Dictionary compiler
//!
//! Turns dictionary sources into an ordered list of `raw → (translation,
//! comment)` entries. Compilation never aborts on a bad line: the line is
//! skipped and reported as a [`Diagnostic`].
//!
//! Name tags expand into several entries. For
//! `@name{ナルト|うずまき, Naruto|Uzumaki}` with a `さん` suffix honorific:
//!
//! ```text
//! ナルト         --> Naruto               (individual)
//! うずまき       --> Uzumaki
//! ナルトうずまき  --> Naruto Uzumaki       (combined, one per name separator)
//! ナルト・うずまき --> Naruto Uzumaki
//! ナルトさん     --> Naruto-san           (honorific)
//! うずまきさん   --> Uzumaki-san
//! ```

use crate::config::CompilerConfig;
use crate::grammar::{self, COMMENT_MARKER, DefinitionError, MetaKey, NameTagError};
use crate::lexer::lex_line;
use crate::mapping::{CompiledMapping, MappedEntry};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One compiled dictionary definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictEntry {
    pub raw: String,
    pub translation: String,
    pub comment: Option<String>,
}

impl DictEntry {
    pub fn new(raw: impl Into<String>, translation: impl Into<String>, comment: Option<String>) -> Self {
        DictEntry {
            raw: raw.into(),
            translation: translation.into(),
            comment,
        }
    }
}

/// Series metadata read from the header comments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictMetadata {
    pub title: Option<String>,
    pub abbr: Option<String>,
    pub link: Option<String>,
}

/// Why a line was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticReason {
    MisbalancedNameTag { raw: usize, translated: usize },
    EmptyNameAlternative,
    EmptyDefinition,
    MultipleDividers,
    TrailingAfterNameTag,
    Unrecognized,
}

impl From<NameTagError> for DiagnosticReason {
    fn from(err: NameTagError) -> Self {
        match err {
            NameTagError::Misbalanced { raw, translated } => {
                DiagnosticReason::MisbalancedNameTag { raw, translated }
            }
            NameTagError::EmptyAlternative => DiagnosticReason::EmptyNameAlternative,
        }
    }
}

impl From<DefinitionError> for DiagnosticReason {
    fn from(err: DefinitionError) -> Self {
        match err {
            DefinitionError::NoDivider => DiagnosticReason::Unrecognized,
            DefinitionError::EmptySide => DiagnosticReason::EmptyDefinition,
            DefinitionError::MultipleDividers => DiagnosticReason::MultipleDividers,
        }
    }
}

impl std::fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticReason::MisbalancedNameTag { raw, translated } => write!(
                f,
                "{}",
                NameTagError::Misbalanced {
                    raw: *raw,
                    translated: *translated
                }
            ),
            DiagnosticReason::EmptyNameAlternative => {
                write!(f, "{}", NameTagError::EmptyAlternative)
            }
            DiagnosticReason::EmptyDefinition => write!(f, "{}", DefinitionError::EmptySide),
            DiagnosticReason::MultipleDividers => {
                write!(f, "{}", DefinitionError::MultipleDividers)
            }
            DiagnosticReason::TrailingAfterNameTag => {
                write!(f, "Unexpected text after name tag")
            }
            DiagnosticReason::Unrecognized => write!(f, "{}", DefinitionError::NoDivider),
        }
    }
}

/// A skipped, misformatted line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub reason: DiagnosticReason,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = if self.text.chars().count() < 40 {
            self.text.clone()
        } else {
            format!("{}...", self.text.chars().take(36).collect::<String>())
        };
        write!(
            f,
            "Ignored misformatted line \"{}\" at line {}... {}",
            text, self.line, self.reason
        )
    }
}

/// Result of compiling a single dictionary source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompiledFile {
    pub metadata: DictMetadata,
    /// Entries in source order, as plain text
    pub entries: Vec<DictEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles dictionary sources according to a [`CompilerConfig`]
pub struct DictionaryCompiler<'c> {
    config: &'c CompilerConfig,
}

impl<'c> DictionaryCompiler<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        DictionaryCompiler { config }
    }

    /// Compile one dictionary source
    pub fn compile(&self, source: &str) -> CompiledFile {
        let mut file = CompiledFile::default();

        for (index, raw_line) in source.lines().enumerate() {
            let line = raw_line.trim().to_string();

            if line.is_empty() {
                continue;
            }
            if line.starts_with(COMMENT_MARKER) {
                if let Some((key, value)) = grammar::parse_meta(&line) {
                    let value = Some(value.to_string());
                    match key {
                        MetaKey::Title => file.metadata.title = value,
                        MetaKey::Abbr => file.metadata.abbr = value,
                        MetaKey::Link => file.metadata.link = value,
                    }
                }
                continue;
            }

            // Anything the editor would underline is never compiled
            let clean = !lex_line(index + 1, &line).has_errors();
            let mut reason: Option<DiagnosticReason> = None;

            if let Some(tag) = grammar::parse_name_tag(&line) {
                let rejected = if !tag.is_terminated() {
                    DiagnosticReason::TrailingAfterNameTag
                } else {
                    match tag.args.validate() {
                        Ok(()) if clean => {
                            let comment = self.clip_comment(tag.comment());
                            let variants =
                                self.name_variants(&tag.args.raw, &tag.args.translated, comment);
                            debug!(line = index + 1, variants = variants.len(), "name tag");
                            file.entries.extend(variants);
                            continue;
                        }
                        Ok(()) => DiagnosticReason::Unrecognized,
                        Err(err) => err.into(),
                    }
                };
                reason = Some(rejected);
            } else {
                match grammar::parse_definition(&line) {
                    Ok(def) if clean => {
                        let comment = self.clip_comment(def.comment);
                        file.entries
                            .push(DictEntry::new(def.raw, def.translation, comment));
                        continue;
                    }
                    Ok(_) | Err(DefinitionError::NoDivider) => {}
                    Err(err) => reason = Some(err.into()),
                }
            }

            let diagnostic = Diagnostic {
                line: index + 1,
                text: line,
                reason: reason.unwrap_or(DiagnosticReason::Unrecognized),
            };
            warn!("{}", diagnostic);
            file.diagnostics.push(diagnostic);
        }

        file
    }

    fn clip_comment(&self, comment: Option<&str>) -> Option<String> {
        let clipped: String = comment?.chars().take(self.config.comment_max_len).collect();
        let clipped = clipped.trim();
        (!clipped.is_empty()).then(|| clipped.to_string())
    }

    /// Generate every entry implied by a validated name tag
    pub fn name_variants(
        &self,
        raw: &[&str],
        translated: &[&str],
        comment: Option<String>,
    ) -> Vec<DictEntry> {
        if raw.len() != translated.len() {
            return Vec::new();
        }

        let individual = raw
            .iter()
            .zip(translated)
            .map(|(r, t)| DictEntry::new(*r, *t, comment.clone()));

        let full_translation = translated.join(" ");
        let combined = self
            .config
            .name_separators
            .iter()
            .map(|sep| DictEntry::new(raw.join(sep), full_translation.clone(), comment.clone()));

        let honorific = self.config.active_honorifics().flat_map(|h| {
            raw.iter().zip(translated).map(|(r, t)| {
                DictEntry::new(format!("{}{}", r, h.raw), h.decorate(t), comment.clone())
            })
        });

        individual.chain(combined).chain(honorific).collect()
    }
}

/// An ordered, de-duplicated dictionary built from one or more sources
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dictionary {
    pub metadata: DictMetadata,
    entries: Vec<DictEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Dictionary {
    /// Build a dictionary from compiled files in priority order.
    ///
    /// Standalone honorifics come first, then each file's entries. A raw
    /// term defined more than once keeps its first position but takes the
    /// last definition, so a series dictionary overrides the common one.
    /// Entries are ordered longest raw term first so longer terms are
    /// substituted before their substrings.
    pub fn build(files: Vec<CompiledFile>, config: &CompilerConfig) -> Self {
        let mut dictionary = Dictionary::default();
        let mut all: Vec<DictEntry> = config
            .active_honorifics()
            .filter(|h| h.standalone)
            .map(|h| DictEntry::new(h.raw.clone(), h.trans.clone(), None))
            .collect();

        for file in files {
            if file.metadata != DictMetadata::default() {
                dictionary.metadata = file.metadata;
            }
            all.extend(file.entries);
            dictionary.diagnostics.extend(file.diagnostics);
        }

        all.sort_by_key(|entry| std::cmp::Reverse(entry.raw.chars().count()));

        let mut positions: HashMap<String, usize> = HashMap::new();
        for entry in all {
            match positions.get(&entry.raw) {
                Some(&at) => dictionary.entries[at] = entry,
                None => {
                    positions.insert(entry.raw.clone(), dictionary.entries.len());
                    dictionary.entries.push(entry);
                }
            }
        }
        dictionary
    }

    /// Compile a single source with the given configuration
    pub fn from_source(source: &str, config: &CompilerConfig) -> Self {
        let file = DictionaryCompiler::new(config).compile(source);
        Dictionary::build(vec![file], config)
    }

    pub fn entries(&self) -> &[DictEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries paired with their definition ids (1-based position)
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (u32, &DictEntry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (index as u32 + 1, entry))
    }

    pub fn lookup(&self, raw: &str) -> Option<&DictEntry> {
        self.entries.iter().find(|entry| entry.raw == raw)
    }

    /// The id-keyed mapping consumed by placeholder resolution
    pub fn mapping(&self) -> CompiledMapping {
        let mut mapping = CompiledMapping::new();
        for (id, entry) in self.iter_with_ids() {
            mapping.insert(id, MappedEntry::new(entry.translation.clone(), entry.comment.clone()));
        }
        mapping
    }
}

/// Minimal HTML escaping for text and attribute values, applied when rendering
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
