//! Extractor abstraction
//!
//! The batch loader only depends on this trait, so tests and alternative document
//! flavours can be injected without touching the pipeline.

use crate::error::ExtractResult;
use crate::types::Record;

/// Turns raw document text into one flat [`Record`].
pub trait DocumentExtractor: Send + Sync {
    /// Short identifier used in log output
    fn name(&self) -> &'static str;

    /// Extract a record from `content`, tagging it with `file_name`.
    ///
    /// Must be pure: the same input always yields the same record.
    fn extract(&self, content: &str, file_name: &str) -> ExtractResult<Record>;
}
