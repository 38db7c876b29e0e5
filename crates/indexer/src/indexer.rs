use crate::error::{IndexerError, Result};
use crate::limits::index_concurrency;
use crate::options::IndexOptions;
use crate::scanner::FileScanner;
use crate::stats::IndexStats;
use codemap_model::{
    Aggregation, Aggregator, Diagnostic, DiagnosticKind, Diagnostics, ProjectModel,
    RelationDetector,
};
use codemap_syntax::{FactExtractor, FileFacts, GoExtractor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

/// Result of one indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexOutput {
    pub model: ProjectModel,
    pub diagnostics: Diagnostics,
    pub stats: IndexStats,
}

struct Extracted {
    facts: FileFacts,
    lines: usize,
}

/// Project indexer that scans, extracts and aggregates source files
pub struct ProjectIndexer {
    root: PathBuf,
    options: IndexOptions,
    scanner: FileScanner,
    extractor: Arc<dyn FactExtractor>,
}

impl ProjectIndexer {
    /// Create indexer for project with default options
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        Self::with_options(root, IndexOptions::default())
    }

    pub fn with_options(root: impl AsRef<Path>, options: IndexOptions) -> Result<Self> {
        options.validate()?;
        let root = root.as_ref().to_path_buf();
        let scanner = FileScanner::with_options(&root, options.scan.clone())?;
        let extractor = GoExtractor::new(options.extractor.clone())?;

        Ok(Self {
            root,
            options,
            scanner,
            extractor: Arc::new(extractor),
        })
    }

    /// Replace the extractor used for every file
    pub fn with_extractor(mut self, extractor: Arc<dyn FactExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Index the project sequentially, in scan order
    pub fn index(&self) -> Result<IndexOutput> {
        self.index_with_cancel(&CancellationToken::new())
    }

    /// Sequential run that checks `cancel` between files
    pub fn index_with_cancel(&self, cancel: &CancellationToken) -> Result<IndexOutput> {
        let start = Instant::now();
        log::info!("Indexing project at {}", self.root.display());

        let (files, mut aggregator, mut stats) = self.prepare()?;
        stats.workers = 1;

        for (done, path) in files.iter().enumerate() {
            if cancel.is_cancelled() {
                log::info!("Indexing cancelled after {done} files");
                return Err(IndexerError::Cancelled { files_done: done });
            }
            let extracted = extract_file(self.extractor.as_ref(), path);
            self.fold(&mut aggregator, &mut stats, path, extracted);
        }

        Ok(self.finish(aggregator, stats, start))
    }

    /// Index the project with extraction spread over blocking workers.
    ///
    /// A single coordinator owns the aggregator and merges results in scan
    /// order, so the output matches `index()` for the same tree. `cancel` is
    /// observed between files; a file already being merged is never cut short.
    pub async fn index_parallel(&self, cancel: CancellationToken) -> Result<IndexOutput> {
        let start = Instant::now();
        let workers = index_concurrency(self.options.workers);
        log::info!(
            "Indexing project at {} with {workers} workers",
            self.root.display()
        );

        let (files, mut aggregator, mut stats) = self.prepare()?;
        stats.workers = workers;

        let semaphore = Arc::new(Semaphore::new(workers));
        let (tx, mut rx) = mpsc::channel::<(usize, Result<Extracted>)>(workers * 2);

        let producer = {
            let extractor = Arc::clone(&self.extractor);
            let files = files.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                for (idx, path) in files.into_iter().enumerate() {
                    let permit = tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                            Ok(permit) => permit,
                            Err(_) => break,
                        },
                    };
                    let extractor = Arc::clone(&extractor);
                    let tx = tx.clone();
                    tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        let result = extract_file(extractor.as_ref(), &path);
                        // receiver gone means the run was cancelled
                        let _ = tx.blocking_send((idx, result));
                    });
                }
            })
        };

        // results arrive in completion order; merge them in scan order
        let mut ready: BTreeMap<usize, Result<Extracted>> = BTreeMap::new();
        let mut next = 0;
        loop {
            let message = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    producer.abort();
                    log::info!("Indexing cancelled after {next} files");
                    return Err(IndexerError::Cancelled { files_done: next });
                }
                message = rx.recv() => message,
            };
            let Some((idx, extracted)) = message else {
                break;
            };
            ready.insert(idx, extracted);
            while let Some(extracted) = ready.remove(&next) {
                self.fold(&mut aggregator, &mut stats, &files[next], extracted);
                next += 1;
            }
        }

        producer
            .await
            .map_err(|e| IndexerError::Other(format!("Indexing producer failed: {e}")))?;
        if cancel.is_cancelled() {
            return Err(IndexerError::Cancelled { files_done: next });
        }

        // a worker that panicked never reports back
        while next < files.len() {
            let extracted = ready.remove(&next).unwrap_or_else(|| {
                Err(IndexerError::Other("extraction worker panicked".to_string()))
            });
            self.fold(&mut aggregator, &mut stats, &files[next], extracted);
            next += 1;
        }

        Ok(self.finish(aggregator, stats, start))
    }

    fn prepare(&self) -> Result<(Vec<PathBuf>, Aggregator, IndexStats)> {
        let scan = self.scanner.scan()?;

        let mut aggregator =
            Aggregator::new(self.options.attach_mode, self.options.duplicate_policy);
        for diagnostic in scan.diagnostics {
            aggregator.record(Diagnostic {
                path: self.relative(&diagnostic.path).to_path_buf(),
                ..diagnostic
            });
        }

        let stats = IndexStats {
            files_found: scan.files.len(),
            ..IndexStats::new()
        };
        Ok((scan.files, aggregator, stats))
    }

    fn fold(
        &self,
        aggregator: &mut Aggregator,
        stats: &mut IndexStats,
        path: &Path,
        extracted: Result<Extracted>,
    ) {
        let relative = self.relative(path);
        match extracted {
            Ok(Extracted { facts, lines }) => {
                stats.add_file(lines);
                aggregator.merge(relative, facts);
            }
            Err(e) => {
                log::warn!("Failed to extract {}: {e}", relative.display());
                stats.add_failure();
                aggregator.record(Diagnostic::new(
                    relative,
                    DiagnosticKind::ExtractionFailed,
                    e.to_string(),
                ));
            }
        }
    }

    fn finish(&self, aggregator: Aggregator, mut stats: IndexStats, start: Instant) -> IndexOutput {
        let Aggregation {
            mut model,
            diagnostics,
        } = aggregator.finish();

        if self.options.detect_relations {
            RelationDetector::default().detect(&mut model);
        }

        stats.record_model(&model, &diagnostics);
        stats.time_ms = start.elapsed().as_millis() as u64;

        log::info!(
            "Indexing complete: {}/{} files in {}ms ({} failed)",
            stats.files_extracted,
            stats.files_found,
            stats.time_ms,
            stats.files_failed
        );

        IndexOutput {
            model,
            diagnostics,
            stats,
        }
    }

    /// Path as shown in the model and diagnostics
    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

fn extract_file(extractor: &dyn FactExtractor, path: &Path) -> Result<Extracted> {
    let source = std::fs::read_to_string(path)?;
    let facts = extractor.extract(&source)?;
    Ok(Extracted {
        lines: source.lines().count(),
        facts,
    })
}
