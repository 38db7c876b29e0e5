use crate::error::{IndexerError, Result};
use crate::scanner::ScanOptions;
use codemap_model::{AttachMode, DuplicatePolicy};
use codemap_syntax::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything that shapes one indexing run.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// attach_mode = "streaming"
/// workers = 4
///
/// [scan]
/// include_tests = false
/// exclude = ["**/*.pb.go"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    pub attach_mode: AttachMode,

    pub duplicate_policy: DuplicatePolicy,

    /// Run relation detection after aggregation
    pub detect_relations: bool,

    /// Parallel extraction workers; `None` falls back to `CODEMAP_INDEX_CONCURRENCY`
    pub workers: Option<usize>,

    pub scan: ScanOptions,

    pub extractor: ExtractorConfig,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            attach_mode: AttachMode::default(),
            duplicate_policy: DuplicatePolicy::default(),
            detect_relations: true,
            workers: None,
            scan: ScanOptions::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl IndexOptions {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let options: Self = toml::from_str(raw).map_err(|e| {
            IndexerError::invalid_config(format!("Failed to parse options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            IndexerError::invalid_config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(IndexerError::invalid_config("workers must be > 0"));
        }
        self.scan.validate().map_err(IndexerError::invalid_config)?;
        self.extractor
            .validate()
            .map_err(IndexerError::invalid_config)?;
        Ok(())
    }

    /// Leave the relation groups empty
    pub fn without_relations(mut self) -> Self {
        self.detect_relations = false;
        self
    }
}
