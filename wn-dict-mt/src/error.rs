/// Error types for the placeholder resolution runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtError {
    /// The machine translation provider failed
    TranslationError(String),
    /// A locale code was rejected before translation
    InvalidLocale(String),
    /// A unit id outside the document
    UnknownUnit(usize),
    /// The event channel closed before the external process finished
    ChannelClosed,
}

impl std::fmt::Display for MtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MtError::TranslationError(msg) => write!(f, "Translation error: {}", msg),
            MtError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            MtError::UnknownUnit(unit) => write!(f, "Unknown unit: {}", unit),
            MtError::ChannelClosed => write!(f, "Document event channel closed"),
        }
    }
}

impl std::error::Error for MtError {}

/// Result type for MT operations
pub type MtResult<T> = Result<T, MtError>;
