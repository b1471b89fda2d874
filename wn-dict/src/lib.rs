//! Dictionary annotation language for per-series translation overrides
//!
//! A dictionary (`.dict`) file maps raw terms to their preferred
//! translations:
//!
//! ```text
//! // series_title :  Naruto
//! @name{ナルト|うずまき, Naruto|Uzumaki}   // Main character
//! 九尾の狐 --> Nine Tailed Fox              // a fox with nine tails
//! ```
//!
//! [`lexer`] classifies such a file character by character for editors,
//! [`compiler`] turns it into an ordered [`Dictionary`], and
//! [`CompiledMapping`] is the id-keyed view handed to placeholder
//! resolution at runtime.

pub mod compiler;
pub mod config;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod loader;
pub mod mapping;
pub mod template;

pub use compiler::{
    CompiledFile, DictEntry, DictMetadata, Diagnostic, DiagnosticReason, Dictionary,
    DictionaryCompiler,
};
pub use config::{CompilerConfig, Honorific, HonorificAffix, Language};
pub use error::{DictError, DictResult};
pub use lexer::{LexState, Lexeme, LineClass, LineLexemes, TokenKind, lex_document, lex_line};
pub use loader::{
    create_dictionary_file, load_config_from_file, load_dictionaries, load_dictionary_file,
};
pub use mapping::{CompiledMapping, MappedEntry, NO_COMMENT};

/// Lines of `source` that contain at least one error token
pub fn lint(source: &str) -> Vec<LineLexemes> {
    lex_document(source)
        .into_iter()
        .filter(LineLexemes::has_errors)
        .collect()
}
