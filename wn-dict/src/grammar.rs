//! Line-level syntax of the dictionary annotation language
//!
//! A dictionary source is a sequence of independent lines. Each line is one of:
//!
//! ```text
//! // series_title :  Some Series          <- metadata comment
//! // any text                              <- comment
//! @name{ナルト|うずまき, Naruto|Uzumaki}  // hero   <- name tag
//! 九尾の狐 --> Nine Tailed Fox  // a fox  <- definition
//! ```
//!
//! Both the lexer (per-character highlighting) and the compiler (building
//! the mapping) use the helpers here, so a line the editor shows as clean is
//! a line the compiler accepts.

/// Separates alternatives inside a name tag argument list
pub const NAME_DIVIDER: char = '|';
/// Separates the raw term from the translated term in a definition
pub const DEF_DIVIDER: &str = "-->";
/// Starts a comment, either full-line or trailing
pub const COMMENT_MARKER: &str = "//";
/// Keyword opening a name tag
pub const NAME_TAG_KEYWORD: &str = "@name";

/// The bracketed argument pair of a name tag: `{raw|raw, trans|trans}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameArgs<'a> {
    /// Raw alternatives, trimmed, in read order
    pub raw: Vec<&'a str>,
    /// Translated alternatives, trimmed, in read order
    pub translated: Vec<&'a str>,
    /// Byte length of the arguments including both braces
    pub len: usize,
}

/// Why a structurally plausible name tag is still invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTagError {
    /// The two alternative lists have a different number of entries
    Misbalanced { raw: usize, translated: usize },
    /// One of the alternatives is empty
    EmptyAlternative,
}

impl std::fmt::Display for NameTagError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameTagError::Misbalanced { raw, translated } => {
                write!(f, "Misbalanced name tag (left:{}, right:{})", raw, translated)
            }
            NameTagError::EmptyAlternative => {
                write!(f, "Cannot have empty entries within a name tag")
            }
        }
    }
}

impl<'a> NameArgs<'a> {
    /// Check the one-to-one invariant between the raw and translated lists
    pub fn validate(&self) -> Result<(), NameTagError> {
        if self.raw.len() != self.translated.len() {
            return Err(NameTagError::Misbalanced {
                raw: self.raw.len(),
                translated: self.translated.len(),
            });
        }
        if self.raw.iter().chain(&self.translated).any(|alt| alt.is_empty()) {
            return Err(NameTagError::EmptyAlternative);
        }
        Ok(())
    }
}

/// A full name tag line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTagParts<'a> {
    pub args: NameArgs<'a>,
    /// Everything after the closing brace
    pub trailing: &'a str,
}

impl<'a> NameTagParts<'a> {
    /// The trailing inline comment, if any
    pub fn comment(&self) -> Option<&'a str> {
        self.trailing
            .trim_start()
            .strip_prefix(COMMENT_MARKER)
            .map(str::trim)
    }

    /// True when only whitespace or an inline comment follows the tag
    pub fn is_terminated(&self) -> bool {
        let rest = self.trailing.trim_start();
        rest.is_empty() || rest.starts_with(COMMENT_MARKER)
    }
}

fn split_alternatives(list: &str) -> Vec<&str> {
    list.split(NAME_DIVIDER).map(str::trim).collect()
}

/// Parse name tag arguments starting at an opening brace
///
/// The arguments end at the first `}`. The raw list ends at the first comma;
/// both sides must contain something other than whitespace for the tag to be
/// considered at all. Returns `None` when the text is not a plausible tag.
pub fn parse_name_args(src: &str) -> Option<NameArgs<'_>> {
    let body = src.strip_prefix('{')?;
    let close = body.find('}')?;
    let inner = &body[..close];
    if inner.contains('{') {
        return None;
    }
    let (raw, translated) = inner.split_once(',')?;
    if raw.trim().is_empty() || translated.trim().is_empty() {
        return None;
    }
    Some(NameArgs {
        raw: split_alternatives(raw),
        translated: split_alternatives(translated),
        len: close + 2,
    })
}

/// Parse a whole `@name{..., ...}` line (leading whitespace allowed)
pub fn parse_name_tag(line: &str) -> Option<NameTagParts<'_>> {
    let rest = line.trim_start().strip_prefix(NAME_TAG_KEYWORD)?;
    let args = parse_name_args(rest)?;
    let trailing = &rest[args.len..];
    Some(NameTagParts { args, trailing })
}

/// A `raw --> translation // comment` line split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionParts<'a> {
    pub raw: &'a str,
    pub translation: &'a str,
    pub comment: Option<&'a str>,
    /// Byte offset of the divider within the parsed text
    pub divider_at: usize,
}

/// Why a line containing a divider is not a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionError {
    NoDivider,
    /// One side of the divider is empty or whitespace only
    EmptySide,
    /// The translated side contains a second divider
    MultipleDividers,
}

impl std::fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DefinitionError::NoDivider => write!(f, "Unrecognized syntactical construct"),
            DefinitionError::EmptySide => {
                write!(f, "Cannot have empty entries within a definition")
            }
            DefinitionError::MultipleDividers => {
                write!(f, "Only one definition divider is allowed per line")
            }
        }
    }
}

/// Parse a definition line
///
/// The translated side is measured up to an inline comment marker, so
/// `pen --> // note` has an empty translation and is rejected.
pub fn parse_definition(line: &str) -> Result<DefinitionParts<'_>, DefinitionError> {
    let divider_at = line.find(DEF_DIVIDER).ok_or(DefinitionError::NoDivider)?;
    let raw = &line[..divider_at];
    let rest = &line[divider_at + DEF_DIVIDER.len()..];
    let (translation, comment) = match rest.find(COMMENT_MARKER) {
        Some(at) => (&rest[..at], Some(rest[at + COMMENT_MARKER.len()..].trim())),
        None => (rest, None),
    };
    if raw.trim().is_empty() || translation.trim().is_empty() {
        return Err(DefinitionError::EmptySide);
    }
    if translation.contains(DEF_DIVIDER) {
        return Err(DefinitionError::MultipleDividers);
    }
    Ok(DefinitionParts {
        raw: raw.trim(),
        translation: translation.trim(),
        comment,
        divider_at,
    })
}

/// Keys allowed in the metadata header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    Title,
    Abbr,
    Link,
}

impl MetaKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaKey::Title => "series_title",
            MetaKey::Abbr => "series_abbr",
            MetaKey::Link => "series_link",
        }
    }
}

/// Parse a metadata comment such as `// series_abbr  :  NRT`
pub fn parse_meta(line: &str) -> Option<(MetaKey, &str)> {
    let body = line.trim_start().strip_prefix(COMMENT_MARKER)?.trim_start();
    let body = body.strip_prefix("series_")?;
    let (key, rest) = if let Some(rest) = body.strip_prefix("title") {
        (MetaKey::Title, rest)
    } else if let Some(rest) = body.strip_prefix("abbr") {
        (MetaKey::Abbr, rest)
    } else if let Some(rest) = body.strip_prefix("link") {
        (MetaKey::Link, rest)
    } else {
        return None;
    };
    let value = rest.trim_start().strip_prefix(':')?;
    Some((key, value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_tag_simple() {
        let tag = parse_name_tag("@name{ナルト|うずまき, Naruto|Uzumaki}").unwrap();
        assert_eq!(tag.args.raw, vec!["ナルト", "うずまき"]);
        assert_eq!(tag.args.translated, vec!["Naruto", "Uzumaki"]);
        assert!(tag.args.validate().is_ok());
        assert!(tag.is_terminated());
        assert_eq!(tag.comment(), None);
    }

    #[test]
    fn test_parse_name_tag_with_comment() {
        let tag = parse_name_tag("  @name{A, B}\t\t// Main character").unwrap();
        assert_eq!(tag.comment(), Some("Main character"));
        assert!(tag.is_terminated());
    }

    #[test]
    fn test_parse_name_tag_trailing_garbage() {
        let tag = parse_name_tag("@name{A, B} junk").unwrap();
        assert!(!tag.is_terminated());
    }

    #[test]
    fn test_parse_name_tag_misbalanced() {
        let tag = parse_name_tag("@name{A|B, C}").unwrap();
        assert_eq!(
            tag.args.validate(),
            Err(NameTagError::Misbalanced {
                raw: 2,
                translated: 1
            })
        );
    }

    #[test]
    fn test_parse_name_tag_empty_alternative() {
        let tag = parse_name_tag("@name{A|, C|D}").unwrap();
        assert_eq!(tag.args.validate(), Err(NameTagError::EmptyAlternative));
    }

    #[test]
    fn test_parse_name_tag_implausible() {
        assert!(parse_name_tag("@name{A}").is_none());
        assert!(parse_name_tag("@name{ , B}").is_none());
        assert!(parse_name_tag("@name{A, B").is_none());
        assert!(parse_name_tag("name{A, B}").is_none());
    }

    #[test]
    fn test_parse_name_args_length() {
        let args = parse_name_args("{A, B} // x").unwrap();
        assert_eq!(&"{A, B} // x"[..args.len], "{A, B}");
    }

    #[test]
    fn test_parse_definition_with_comment() {
        let def = parse_definition("pen --> fountain pen // a writing tool").unwrap();
        assert_eq!(def.raw, "pen");
        assert_eq!(def.translation, "fountain pen");
        assert_eq!(def.comment, Some("a writing tool"));
        assert_eq!(def.divider_at, 4);
    }

    #[test]
    fn test_parse_definition_empty_sides() {
        assert_eq!(parse_definition(" --> Y"), Err(DefinitionError::EmptySide));
        assert_eq!(parse_definition("X -->   "), Err(DefinitionError::EmptySide));
        assert_eq!(
            parse_definition("X --> // only a comment"),
            Err(DefinitionError::EmptySide)
        );
    }

    #[test]
    fn test_parse_definition_multiple_dividers() {
        assert_eq!(
            parse_definition("A --> B --> C"),
            Err(DefinitionError::MultipleDividers)
        );
    }

    #[test]
    fn test_parse_definition_no_divider() {
        assert_eq!(parse_definition("just text"), Err(DefinitionError::NoDivider));
    }

    #[test]
    fn test_parse_meta() {
        assert_eq!(
            parse_meta("// series_title :  Naruto"),
            Some((MetaKey::Title, "Naruto"))
        );
        assert_eq!(parse_meta("//series_abbr:NRT"), Some((MetaKey::Abbr, "NRT")));
        assert_eq!(
            parse_meta("// series_link  :  https://ncode.syosetu.com/n1234"),
            Some((MetaKey::Link, "https://ncode.syosetu.com/n1234"))
        );
        assert_eq!(parse_meta("// series_author : someone"), None);
        assert_eq!(parse_meta("// plain comment"), None);
    }
}
