//! # Codemap Indexer
//!
//! Walks a project tree and folds every Go file into one `ProjectModel`.
//!
//! ## Pipeline
//!
//! ```text
//! Root directory
//!     │
//!     ├──> File Scanner (.gitignore aware, globs, size cap)
//!     │      └─> Sorted *.go paths
//!     │
//!     ├──> Fact Extractor (tree-sitter, per file, parallel or sequential)
//!     │      └─> FileFacts
//!     │
//!     └──> Aggregator (single owner, scan order)
//!            └─> ProjectModel + Diagnostics + IndexStats
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use codemap_indexer::ProjectIndexer;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let output = ProjectIndexer::new("/path/to/project")?.index()?;
//!
//!     println!(
//!         "Indexed {} files into {} packages",
//!         output.stats.files_extracted, output.stats.packages
//!     );
//!     for diagnostic in &output.diagnostics {
//!         eprintln!("{diagnostic}");
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod indexer;
mod limits;
mod options;
mod scanner;
mod stats;

pub use error::{IndexerError, Result};
pub use indexer::{IndexOutput, ProjectIndexer};
pub use limits::index_concurrency;
pub use options::IndexOptions;
pub use scanner::{FileScanner, ScanOptions, ScanOutcome};
pub use stats::IndexStats;

pub use tokio_util::sync::CancellationToken;
