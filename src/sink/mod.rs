//! Output sinks for the enriched table

mod csv_sink;

pub use csv_sink::{format_score, CsvSink, OUTPUT_HEADER};

use crate::review::EnrichedReviewRecord;
use thiserror::Error;

/// Errors from writing the enriched table
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives the enriched table, in input order.
pub trait OutputSink: Send {
    /// Append `records` to the table. The first call also writes the
    /// header, even when `records` is empty.
    fn write_table(&mut self, records: &[EnrichedReviewRecord]) -> Result<(), SinkError>;
}
