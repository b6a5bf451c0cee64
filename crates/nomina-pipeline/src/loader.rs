//! Concurrent batch loading
//!
//! Every document of a batch is attempted. Each one produces its own
//! `Result`; a failure never aborts its siblings. Outcomes are partitioned after
//! the join, with successes kept in submission order.

use crate::error::{LoadError, LoadResult};
use futures::future::join_all;
use nomina_parser::{CfdiExtractor, DocumentExtractor, Record};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Suffix appended to the first failure message of a partially failed batch
pub const PARTIAL_FAILURE_SUFFIX: &str = "Some files could not be processed.";

/// One raw input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name, usually the file name
    pub name: String,
    pub content: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Successes and failures of one batch
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<Record>,
    pub failures: Vec<LoadError>,
}

impl BatchOutcome {
    /// Partition per-document results, keeping submission order on both sides
    pub fn from_results(results: impl IntoIterator<Item = LoadResult<Record>>) -> Self {
        let mut outcome = Self::default();
        for result in results {
            match result {
                Ok(record) => outcome.records.push(record),
                Err(err) => {
                    warn!(file = err.file(), error = %err, "document skipped");
                    outcome.failures.push(err);
                }
            }
        }
        outcome
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Message to surface when at least one document failed: the first failure
    /// followed by a generic notice.
    pub fn summary(&self) -> Option<String> {
        self.failures
            .first()
            .map(|first| format!("{}. {}", first, PARTIAL_FAILURE_SUFFIX))
    }
}

/// Loads batches of documents into records
///
/// The extractor is injected so other receipt flavours can be plugged in.
#[derive(Clone)]
pub struct BatchLoader {
    extractor: Arc<dyn DocumentExtractor>,
}

impl Default for BatchLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BatchLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchLoader")
            .field("extractor", &self.extractor.name())
            .finish()
    }
}

impl BatchLoader {
    /// Loader backed by the CFDI payroll extractor
    pub fn new() -> Self {
        Self::with_extractor(Arc::new(CfdiExtractor::new()))
    }

    pub fn with_extractor(extractor: Arc<dyn DocumentExtractor>) -> Self {
        Self { extractor }
    }

    /// Extract one in-memory document
    pub fn load_document(&self, document: &Document) -> LoadResult<Record> {
        self.extractor
            .extract(&document.content, &document.name)
            .map_err(|e| LoadError::extract(&document.name, e))
    }

    /// Extract documents already held in memory
    pub fn load_documents(&self, documents: &[Document]) -> BatchOutcome {
        info!("Loading batch of {} documents", documents.len());
        let outcome =
            BatchOutcome::from_results(documents.iter().map(|doc| self.load_document(doc)));
        log_outcome(&outcome);
        outcome
    }

    /// Read and extract files concurrently
    pub async fn load_paths(&self, paths: &[PathBuf]) -> BatchOutcome {
        info!("Loading batch of {} files", paths.len());

        let futures = paths.iter().map(|path| self.load_path(path));
        let results = join_all(futures).await;

        let outcome = BatchOutcome::from_results(results);
        log_outcome(&outcome);
        outcome
    }

    async fn load_path(&self, path: &Path) -> LoadResult<Record> {
        let name = display_name(path);
        debug!(file = %name, "reading document");

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| LoadError::io(&name, e))?;
        let content = String::from_utf8_lossy(&bytes);

        self.load_document(&Document::new(name, content))
    }
}

/// File name component of `path`, or the whole path when there is none
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_outcome(outcome: &BatchOutcome) {
    info!(
        "Batch loaded: {} succeeded, {} failed",
        outcome.records.len(),
        outcome.failures.len()
    );
}
