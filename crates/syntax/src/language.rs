use crate::error::{Result, SyntaxError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source language understood by an extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "go" => Language::Go,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Unknown => "unknown",
        }
    }

    /// File extensions that mark source files of this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Go => &["go"],
            Language::Unknown => &[],
        }
    }

    /// Suffix of test files, if the language has a naming convention for them
    pub fn test_file_suffix(self) -> Option<&'static str> {
        match self {
            Language::Go => Some("_test.go"),
            Language::Unknown => None,
        }
    }

    /// Check whether a path is a source file of this language
    pub fn matches_path(self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Result<tree_sitter::Language> {
        match self {
            Language::Go => Ok(tree_sitter_go::LANGUAGE.into()),
            Language::Unknown => Err(SyntaxError::unsupported_language(self.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("go"), Language::Go);
        assert_eq!(Language::from_extension("GO"), Language::Go);
        assert_eq!(Language::from_extension("rs"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("pkg/service.go"), Language::Go);
        assert_eq!(Language::from_path("README.md"), Language::Unknown);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
    }

    #[test]
    fn test_matches_path() {
        assert!(Language::Go.matches_path("main.go"));
        assert!(!Language::Go.matches_path("main.go.orig"));
        assert!(!Language::Unknown.matches_path("main"));
        assert!(Language::Go.matches_path("cmd/MAIN.GO"));
        assert_eq!(Language::Go.extensions(), &["go"]);
        assert!(Language::Unknown.extensions().is_empty());
    }

    #[test]
    fn test_tree_sitter_language() {
        assert!(Language::Go.tree_sitter_language().is_ok());
        assert!(Language::Unknown.tree_sitter_language().is_err());
    }
}
