use codemap_model::{Diagnostics, ProjectModel};
use serde::{Deserialize, Serialize};

/// Statistics about indexing operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Files returned by the scanner
    pub files_found: usize,

    /// Files whose facts reached the aggregator
    pub files_extracted: usize,

    /// Files that could not be read or parsed
    pub files_failed: usize,

    /// Total source lines of extracted files
    pub total_lines: usize,

    pub packages: usize,
    pub types: usize,
    pub functions: usize,
    pub methods: usize,

    pub diagnostics: usize,

    /// Parallel extraction workers (1 for a sequential run)
    pub workers: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, lines: usize) {
        self.files_extracted += 1;
        self.total_lines += lines;
    }

    pub fn add_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Copy entity counts from the finished model
    pub fn record_model(&mut self, model: &ProjectModel, diagnostics: &Diagnostics) {
        self.packages = model.package_count();
        self.types = model.type_count();
        self.functions = model.function_count();
        self.methods = model.method_count();
        self.diagnostics = diagnostics.len();
    }
}
