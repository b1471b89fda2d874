//! Character-stream lexer for dictionary sources
//!
//! The lexer is driven one call at a time, like an editor highlighting mode:
//! each call to [`next_token`] consumes one lexical unit from a
//! [`LineCursor`] and returns its classification. It never fails; any
//! position no rule accepts becomes a [`TokenKind::LineError`] one character
//! wide, so an editor can underline exactly the offending text.
//!
//! Rule order in [`LexState::Normal`]:
//!
//! 1. metadata comment, then ordinary comment (rest of line)
//! 2. `@name{raw, trans}` name tag (lookahead, both sides non-blank)
//! 3. `raw --> trans` definition (lookahead, both sides non-blank)
//! 4. whitespace up to end of line
//! 5. otherwise a single-character error
//!
//! # Example
//!
//! ```ignore
//! use wn_dict::lexer::{lex_line, TokenKind};
//!
//! let line = lex_line(1, "pen --> fountain pen // a writing tool");
//! assert!(line.contains(TokenKind::Divider));
//! assert!(!line.has_errors());
//! ```

pub mod cursor;
pub mod token;

pub use cursor::LineCursor;
pub use token::{Lexeme, LineClass, LineLexemes, TokenKind};

use crate::grammar::{self, COMMENT_MARKER, DEF_DIVIDER, NAME_DIVIDER, NAME_TAG_KEYWORD};
use tracing::trace;

/// Lexer state carried between calls within one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexState {
    #[default]
    Normal,
    /// Inside a name tag; the arguments are checked on first entry
    InNameTag { args_validated: bool },
    /// The name tag arguments failed validation; the rest of the line is in error
    RejectedNameTag,
    /// Between the raw term and the end of a definition's translated term
    InDivider,
}

/// Consume one lexical unit and classify it.
///
/// Always advances the cursor by at least one character unless it is
/// already at end of line.
pub fn next_token(cursor: &mut LineCursor<'_>, state: &mut LexState) -> Option<TokenKind> {
    if cursor.eol() {
        return None;
    }
    match *state {
        LexState::Normal => normal_token(cursor, state),
        LexState::InNameTag { args_validated } => name_tag_token(cursor, state, args_validated),
        LexState::RejectedNameTag => {
            cursor.next();
            Some(TokenKind::LineError)
        }
        LexState::InDivider => divider_token(cursor, state),
    }
}

fn normal_token(cursor: &mut LineCursor<'_>, state: &mut LexState) -> Option<TokenKind> {
    let rest = cursor.rest();

    if grammar::parse_meta(rest).is_some() {
        cursor.skip_to_end();
        return Some(TokenKind::Meta);
    }
    if rest.trim_start().starts_with(COMMENT_MARKER) {
        cursor.skip_to_end();
        return Some(TokenKind::Comment);
    }

    let is_name_tag = rest
        .trim_start()
        .strip_prefix(NAME_TAG_KEYWORD)
        .and_then(grammar::parse_name_args)
        .is_some();
    if is_name_tag {
        cursor.skip_to("{");
        *state = LexState::InNameTag {
            args_validated: false,
        };
        return Some(TokenKind::NameTag);
    }

    if grammar::parse_definition(rest).is_ok() {
        cursor.skip_to(DEF_DIVIDER);
        *state = LexState::InDivider;
        return None;
    }

    if rest.trim().is_empty() {
        cursor.skip_to_end();
        return None;
    }

    cursor.next();
    Some(TokenKind::LineError)
}

fn name_tag_token(
    cursor: &mut LineCursor<'_>,
    state: &mut LexState,
    args_validated: bool,
) -> Option<TokenKind> {
    if !args_validated {
        let valid = grammar::parse_name_args(cursor.rest())
            .map(|args| args.validate())
            .is_some_and(|result| result.is_ok());
        if !valid {
            trace!(pos = cursor.pos(), "name tag arguments rejected");
            *state = LexState::RejectedNameTag;
            cursor.next();
            return Some(TokenKind::LineError);
        }
        *state = LexState::InNameTag {
            args_validated: true,
        };
    }

    match cursor.peek() {
        Some(',') | Some('{') => {
            cursor.next();
            None
        }
        Some(NAME_DIVIDER) => {
            cursor.next();
            Some(TokenKind::NameSplit)
        }
        Some('}') => {
            cursor.next();
            // Trailing spaces between the tag and an inline comment or end of line
            cursor.eat_whitespace();
            *state = if cursor.eol() || cursor.rest().starts_with(COMMENT_MARKER) {
                LexState::Normal
            } else {
                LexState::RejectedNameTag
            };
            None
        }
        _ => {
            cursor.eat_while(|c| !matches!(c, ',' | '{' | '}' | NAME_DIVIDER));
            None
        }
    }
}

fn divider_token(cursor: &mut LineCursor<'_>, state: &mut LexState) -> Option<TokenKind> {
    if cursor.eat_str(DEF_DIVIDER) {
        return Some(TokenKind::Divider);
    }

    // The translated term runs up to an inline comment or the end of line
    let start = cursor.pos();
    if !cursor.skip_to(COMMENT_MARKER) {
        cursor.skip_to_end();
    }
    if cursor.pos() == start {
        cursor.next();
    }
    *state = LexState::Normal;
    None
}

/// Iterator over the lexemes of a single line
pub struct LineLexer<'a> {
    cursor: LineCursor<'a>,
    state: LexState,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str) -> Self {
        LineLexer {
            cursor: LineCursor::new(line),
            state: LexState::default(),
        }
    }

    pub fn state(&self) -> LexState {
        self.state
    }
}

impl<'a> Iterator for LineLexer<'a> {
    type Item = Lexeme;

    fn next(&mut self) -> Option<Lexeme> {
        if self.cursor.eol() {
            return None;
        }
        let start = self.cursor.pos();
        let kind = next_token(&mut self.cursor, &mut self.state);
        Some(Lexeme {
            kind,
            span: start..self.cursor.pos(),
        })
    }
}

/// Lex one line starting from [`LexState::Normal`]
pub fn lex_line(line_number: usize, line: &str) -> LineLexemes {
    LineLexemes {
        line_number,
        text: line.to_string(),
        lexemes: LineLexer::new(line).collect(),
    }
}

/// Lex every line of a document; line numbers are 1-based
pub fn lex_document(source: &str) -> Vec<LineLexemes> {
    source
        .lines()
        .enumerate()
        .map(|(index, line)| lex_line(index + 1, line))
        .collect()
}
