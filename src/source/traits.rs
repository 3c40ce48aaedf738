//! Review source trait definitions

use crate::review::ReviewRecord;
use thiserror::Error;

/// Errors that can occur while fetching reviews
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Review {review_id}: cannot parse {column}: {reason}")]
    Parse {
        review_id: i64,
        column: &'static str,
        reason: String,
    },
}

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Supplies review records to the pipeline.
///
/// Implementations must be thread-safe (Send + Sync) so a source can be
/// held across the orchestrator's await points.
pub trait ReviewSource: Send + Sync {
    /// Short description for logs (a path, a table name)
    fn describe(&self) -> String;

    /// Fetch every review. Order is whatever the source yields; the
    /// pipeline preserves it in the output.
    fn fetch(&self) -> SourceResult<Vec<ReviewRecord>>;
}

/// An in-memory batch is its own source.
impl ReviewSource for Vec<ReviewRecord> {
    fn describe(&self) -> String {
        format!("in-memory ({} reviews)", self.len())
    }

    fn fetch(&self) -> SourceResult<Vec<ReviewRecord>> {
        Ok(self.clone())
    }
}
