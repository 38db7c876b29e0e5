use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Category of a non-fatal problem found during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File could not be read or its syntax facts could not be extracted
    ExtractionFailed,
    /// Extractor found no package clause; the file was skipped
    MissingPackage,
    /// Method receiver type is not declared in the package; the method was dropped
    UnresolvedReceiver,
    /// Directory entry could not be visited
    WalkError,
    /// Source file left out by the scanner (over the size cap)
    Skipped,
}

impl DiagnosticKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtractionFailed => "extraction_failed",
            Self::MissingPackage => "missing_package",
            Self::UnresolvedReceiver => "unresolved_receiver",
            Self::WalkError => "walk_error",
            Self::Skipped => "skipped",
        }
    }
}

/// One (path, message) entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(path: impl AsRef<Path>, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{}] {}",
            self.path.display(),
            self.kind.as_str(),
            self.message
        )
    }
}

/// Ordered diagnostics collected during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("diagnostic: {diagnostic}");
        self.entries.push(diagnostic);
    }

    pub fn record(
        &mut self,
        path: impl AsRef<Path>,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::new(path, kind, message));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Entries referring to `path`
    pub fn for_path<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a Diagnostic> {
        self.entries.iter().filter(move |d| d.path == path)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
