use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    #[error("Type not found: {package}.{name}")]
    TypeNotFound { package: String, name: String },

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Package dependency cycle involving: {0}")]
    DependencyCycle(String),
}
