use crate::error::{IndexerError, Result};
use codemap_model::{Diagnostic, DiagnosticKind};
use codemap_syntax::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

const MAX_FILE_SIZE_BYTES: u64 = 1_048_576; // 1 MB

/// Directory names never descended into
const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // dependencies / fixtures
    "vendor",
    "node_modules",
    "third_party",
    "third-party",
    "testdata",
];

/// What the scanner picks up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Index `*_test.go` files
    pub include_tests: bool,

    /// Descend into hidden files and directories
    pub include_hidden: bool,

    /// Honor `.gitignore` / `.ignore` files, even outside a git checkout
    pub respect_gitignore: bool,

    /// Files larger than this are skipped
    pub max_file_bytes: u64,

    /// Glob patterns matched against root-relative paths
    pub exclude: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_tests: true,
            include_hidden: false,
            respect_gitignore: true,
            max_file_bytes: MAX_FILE_SIZE_BYTES,
            exclude: Vec::new(),
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_file_bytes == 0 {
            return Err("max_file_bytes must be > 0".to_string());
        }
        Ok(())
    }
}

/// Files found by one scan, plus the entries that were not indexed
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub files: Vec<PathBuf>,
    /// `WalkError` for unvisitable entries, `Skipped` for oversized files
    pub diagnostics: Vec<Diagnostic>,
}

/// Scanner for finding source files in a project
#[derive(Debug, Clone)]
pub struct FileScanner {
    root: PathBuf,
    language: Language,
    options: ScanOptions,
    excludes: GlobSet,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            language: Language::Go,
            options: ScanOptions::default(),
            excludes: GlobSet::empty(),
        }
    }

    pub fn with_options(root: impl AsRef<Path>, options: ScanOptions) -> Result<Self> {
        options.validate().map_err(IndexerError::invalid_config)?;
        let excludes = build_excludes(&options.exclude)?;
        Ok(Self {
            excludes,
            options,
            ..Self::new(root)
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Scan the root for source files (.gitignore aware).
    ///
    /// Fails only when the root itself is missing, not a directory or
    /// unreadable. Entries that cannot be visited further down are logged and
    /// returned as `WalkError` diagnostics; source files over the size cap as
    /// `Skipped`. Files come back sorted.
    pub fn scan(&self) -> Result<ScanOutcome> {
        self.check_root()?;

        let mut outcome = ScanOutcome::default();

        let root = self.root.clone();
        let excludes = self.excludes.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(!self.options.include_hidden)
            .git_ignore(self.options.respect_gitignore)
            .git_global(self.options.respect_gitignore)
            .git_exclude(self.options.respect_gitignore)
            .ignore(self.options.respect_gitignore)
            .require_git(false);
        builder.filter_entry(move |entry| {
            entry.depth() == 0
                || !(is_ignored_scope(entry.path(), &root)
                    || is_excluded(entry.path(), &root, &excludes))
        });

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.is_source_file(path) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.options.max_file_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.options.max_file_bytes
                            );
                            outcome.diagnostics.push(Diagnostic::new(
                                path,
                                DiagnosticKind::Skipped,
                                format!(
                                    "file is {} bytes, over the {} byte limit",
                                    meta.len(),
                                    self.options.max_file_bytes
                                ),
                            ));
                            continue;
                        }
                    }

                    outcome.files.push(path.to_path_buf());
                }
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    let path = error_path(&e).unwrap_or(self.root.as_path());
                    outcome.diagnostics.push(Diagnostic::new(
                        path,
                        DiagnosticKind::WalkError,
                        e.to_string(),
                    ));
                }
            }
        }

        outcome.files.sort();
        log::info!(
            "Found {} {} files under {}",
            outcome.files.len(),
            self.language.as_str(),
            self.root.display()
        );
        Ok(outcome)
    }

    fn check_root(&self) -> Result<()> {
        let meta = std::fs::metadata(&self.root).map_err(|e| {
            IndexerError::invalid_path(format!("{}: {e}", self.root.display()))
        })?;
        if !meta.is_dir() {
            return Err(IndexerError::invalid_path(format!(
                "Not a directory: {}",
                self.root.display()
            )));
        }
        std::fs::read_dir(&self.root).map_err(|e| {
            IndexerError::invalid_path(format!(
                "Unreadable directory {}: {e}",
                self.root.display()
            ))
        })?;
        Ok(())
    }

    /// Check if file belongs to the scanned language (and test policy)
    fn is_source_file(&self, path: &Path) -> bool {
        if !self.language.matches_path(path) {
            return false;
        }
        if self.options.include_tests {
            return true;
        }
        match (self.language.test_file_suffix(), path.file_name().and_then(|n| n.to_str())) {
            (Some(suffix), Some(name)) => !name.ends_with(suffix),
            _ => true,
        }
    }
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| {
            IndexerError::invalid_config(format!("Invalid exclude pattern {pattern:?}: {e}"))
        })?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| IndexerError::invalid_config(e.to_string()))
}

fn is_ignored_scope(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => {
            let lowered = name.to_string_lossy().to_lowercase();
            // go tooling skips `_`-prefixed directories and files
            lowered.starts_with('_') || IGNORED_SCOPES.contains(&lowered.as_str())
        }
        _ => false,
    })
}

fn is_excluded(path: &Path, root: &Path, excludes: &GlobSet) -> bool {
    if excludes.is_empty() {
        return false;
    }
    path.strip_prefix(root)
        .map(|relative| excludes.is_match(relative))
        .unwrap_or(false)
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}
