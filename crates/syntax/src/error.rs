use thiserror::Error;

/// Result type for fact extraction
pub type Result<T> = std::result::Result<T, SyntaxError>;

/// Errors that can occur while extracting syntax facts from one file
#[derive(Error, Debug)]
pub enum SyntaxError {
    /// Failed to parse the source code
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Unsupported language
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Source exceeds the configured size cap
    #[error("Source too large: {size} bytes (limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),
}

impl SyntaxError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create an unsupported language error
    pub fn unsupported_language(lang: impl Into<String>) -> Self {
        Self::UnsupportedLanguage(lang.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }
}
