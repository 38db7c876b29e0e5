//! Boundary between the indexer and whatever parser produces syntax facts.

use crate::error::Result;
use crate::language::Language;
use crate::types::FileFacts;

/// Turns one file's text into normalized syntax facts.
///
/// Implementations must be pure with respect to their input: extracting the
/// same text twice yields the same facts, and no state is shared between
/// calls. This is what lets the indexer run extractions on worker threads.
pub trait FactExtractor: Send + Sync {
    /// Language this extractor understands
    fn language(&self) -> Language;

    /// Extract facts from the full text of one file
    fn extract(&self, source: &str) -> Result<FileFacts>;
}
