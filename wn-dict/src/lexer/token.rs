use serde::Serialize;
use std::ops::Range;

/// Classification of a lexical unit.
///
/// Positions that are plain content, whitespace or structural punctuation
/// carry no classification at all (`None` in [`Lexeme::kind`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `// series_title|abbr|link : ...`
    Meta,
    /// `// ...`
    Comment,
    /// The `@name` keyword of a name tag
    NameTag,
    /// A `|` between name alternatives
    NameSplit,
    /// The `-->` of a definition
    Divider,
    /// A position no grammar rule accepts
    LineError,
}

impl TokenKind {
    /// Style class handed to the editor highlighting integration
    pub fn style(&self) -> &'static str {
        match self {
            TokenKind::Meta => "dict-meta",
            TokenKind::Comment => "dict-comment",
            TokenKind::NameTag => "dict-nametag",
            TokenKind::NameSplit => "dict-namesplit",
            TokenKind::Divider => "dict-divider",
            TokenKind::LineError => "line-dict-error",
        }
    }
}

/// One lexical unit: a classification and the byte range it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme {
    pub kind: Option<TokenKind>,
    pub span: Range<usize>,
}

impl Lexeme {
    pub fn is_error(&self) -> bool {
        self.kind == Some(TokenKind::LineError)
    }
}

/// Coarse classification of a whole line, derived from its lexemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClass {
    Blank,
    Comment,
    Meta,
    NameTag,
    Definition,
    Malformed,
}

/// All lexemes of one source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineLexemes {
    /// 1-based line number within the document
    pub line_number: usize,
    pub text: String,
    pub lexemes: Vec<Lexeme>,
}

impl LineLexemes {
    pub fn has_errors(&self) -> bool {
        self.lexemes.iter().any(Lexeme::is_error)
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.lexemes.iter().any(|lexeme| lexeme.kind == Some(kind))
    }

    /// The source text covered by a lexeme
    pub fn slice(&self, lexeme: &Lexeme) -> &str {
        &self.text[lexeme.span.clone()]
    }

    /// Error positions merged into contiguous ranges, for underlining
    pub fn error_spans(&self) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = Vec::new();
        for lexeme in self.lexemes.iter().filter(|l| l.is_error()) {
            match spans.last_mut() {
                Some(last) if last.end == lexeme.span.start => last.end = lexeme.span.end,
                _ => spans.push(lexeme.span.clone()),
            }
        }
        spans
    }

    pub fn class(&self) -> LineClass {
        if self.has_errors() {
            LineClass::Malformed
        } else if self.contains(TokenKind::NameTag) {
            LineClass::NameTag
        } else if self.contains(TokenKind::Divider) {
            LineClass::Definition
        } else if self.contains(TokenKind::Meta) {
            LineClass::Meta
        } else if self.contains(TokenKind::Comment) {
            LineClass::Comment
        } else {
            LineClass::Blank
        }
    }
}
