//! Enrichment pipeline
//!
//! `RecordEnricher` turns one review into one enriched review.
//! `BatchOrchestrator` applies it to a whole batch with bounded
//! parallelism and reassembles the results in input order.

mod enricher;
mod orchestrator;
mod outcome;

pub use enricher::{EnrichError, EnrichErrorKind, RecordEnricher};
pub use orchestrator::{BatchOrchestrator, ErrorPolicy, PipelineError};
pub use outcome::{BatchOutcome, BatchSummary, SkippedRecord};
