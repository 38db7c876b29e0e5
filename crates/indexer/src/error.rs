use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Syntax error: {0}")]
    SyntaxError(#[from] codemap_syntax::SyntaxError),

    #[error("Invalid project path: {0}")]
    InvalidPath(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Indexing cancelled after {files_done} files")]
    Cancelled { files_done: usize },

    #[error("{0}")]
    Other(String),
}

impl IndexerError {
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
