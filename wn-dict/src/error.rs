use std::path::PathBuf;

/// Error types for loading and compiling dictionary files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictError {
    /// The dictionary file does not exist
    NotFound(PathBuf),
    /// The dictionary file exists but has no content
    Empty(PathBuf),
    /// Reading or writing the file failed
    Io { path: PathBuf, message: String },
    /// A configuration file could not be parsed
    Config(String),
    /// A dictionary filename does not follow `<abbr>_<host>_<code>.dict`
    InvalidFileName(String),
}

impl std::fmt::Display for DictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DictError::NotFound(path) => {
                write!(f, "Dictionary file not found: {}", path.display())
            }
            DictError::Empty(path) => write!(f, "Dictionary file is empty: {}", path.display()),
            DictError::Io { path, message } => {
                write!(f, "Failed to access '{}': {}", path.display(), message)
            }
            DictError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DictError::InvalidFileName(name) => {
                write!(f, "Invalid dictionary filename: {}", name)
            }
        }
    }
}

impl std::error::Error for DictError {}

/// Result type for dictionary operations
pub type DictResult<T> = Result<T, DictError>;
