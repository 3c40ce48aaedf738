//! Batch orchestrator for enriching a whole review table
//!
//! Enrichments run concurrently on the tokio runtime, bounded by a
//! semaphore. Each task carries its input index so results can be put
//! back in input order no matter which finishes first.

use super::enricher::{EnrichError, RecordEnricher};
use super::outcome::{BatchOutcome, BatchSummary, SkippedRecord};
use crate::review::{EnrichedReviewRecord, ReviewRecord};
use crate::sink::{OutputSink, SinkError};
use crate::source::{ReviewSource, SourceError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// What to do when a record fails enrichment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Any failed record fails the run
    #[default]
    FailFast,
    /// Records with an invalid rating are reported in
    /// `BatchOutcome::skipped` and left out of the table; scorer errors
    /// still fail the run
    SkipInvalid,
}

/// Errors that abort a batch run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("enrichment failed: {0}")]
    Enrich(#[from] EnrichError),

    #[error("sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("enrichment task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs the record enricher over a batch.
#[derive(Debug, Clone)]
pub struct BatchOrchestrator {
    enricher: Arc<RecordEnricher>,
    concurrency: usize,
    policy: ErrorPolicy,
}

impl BatchOrchestrator {
    /// Create an orchestrator using the machine's available parallelism.
    pub fn new(enricher: RecordEnricher) -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            enricher: Arc::new(enricher),
            concurrency,
            policy: ErrorPolicy::default(),
        }
    }

    /// Cap the number of in-flight enrichments (minimum 1).
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Enrich every record, returning the table in input order.
    ///
    /// A fatal failure aborts the run once every record before it has
    /// resolved, so the error returned is always the one for the earliest
    /// failing record in input order. Tasks still in flight are cancelled
    /// when the task set is dropped.
    pub async fn run(&self, records: Vec<ReviewRecord>) -> Result<BatchOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("batch", %run_id, records = records.len());
        self.run_batch(run_id, records).instrument(span).await
    }

    /// Fetch every record from `source` and enrich the batch.
    ///
    /// On a multi-threaded runtime the fetch runs under
    /// `block_in_place`, so a slow database read does not hold up other
    /// tasks scheduled on the same worker.
    pub async fn run_source(
        &self,
        source: &dyn ReviewSource,
    ) -> Result<BatchOutcome, PipelineError> {
        let records = fetch_records(source)?;
        info!(source = %source.describe(), records = records.len(), "fetched batch");
        self.run(records).await
    }

    /// Fetch from `source`, enrich, and write the table to `sink`.
    ///
    /// Nothing is written unless the whole batch succeeds.
    pub async fn run_to_sink(
        &self,
        source: &dyn ReviewSource,
        sink: &mut dyn OutputSink,
    ) -> Result<BatchSummary, PipelineError> {
        let outcome = self.run_source(source).await?;
        sink.write_table(&outcome.records)?;

        let summary = outcome.summary();
        info!(
            run_id = %summary.run_id,
            written = summary.written,
            skipped = summary.skipped,
            "batch written"
        );
        Ok(summary)
    }

    async fn run_batch(
        &self,
        run_id: Uuid,
        records: Vec<ReviewRecord>,
    ) -> Result<BatchOutcome, PipelineError> {
        let total = records.len();
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, record) in records.into_iter().enumerate() {
            let enricher = Arc::clone(&self.enricher);
            let permits = Arc::clone(&permits);
            tasks.spawn(
                async move {
                    // The semaphore is never closed, so acquisition only
                    // waits for a free slot.
                    let _permit = permits.acquire_owned().await.ok();
                    (index, enricher.enrich(record).await)
                }
                .in_current_span(),
            );
        }

        let mut slots: Vec<Option<EnrichedReviewRecord>> = vec![None; total];
        let mut resolved = vec![false; total];
        let mut frontier = 0;
        let mut failure: Option<(usize, EnrichError)> = None;
        let mut skipped = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined?;
            resolved[index] = true;
            match result {
                Ok(enriched) => {
                    debug!(index, review_id = enriched.review_id(), "record enriched");
                    slots[index] = Some(enriched);
                }
                Err(err) if self.policy == ErrorPolicy::SkipInvalid && err.is_invalid_rating() => {
                    warn!(index, review_id = err.review_id, error = %err, "skipping record");
                    skipped.push(SkippedRecord {
                        index,
                        review_id: err.review_id,
                        reason: err.kind.to_string(),
                    });
                }
                Err(err) => {
                    debug!(index, review_id = err.review_id, error = %err, "record failed");
                    if failure.as_ref().map_or(true, |(first, _)| index < *first) {
                        failure = Some((index, err));
                    }
                }
            }

            // The reported failure is the lowest-index one, so wait until
            // every record ahead of it has resolved.
            while frontier < total && resolved[frontier] {
                frontier += 1;
            }
            if matches!(&failure, Some((first, _)) if frontier > *first) {
                if let Some((index, err)) = failure.take() {
                    error!(index, review_id = err.review_id, error = %err, "aborting batch");
                    return Err(err.into());
                }
            }
        }

        if let Some((index, err)) = failure {
            error!(index, review_id = err.review_id, error = %err, "aborting batch");
            return Err(err.into());
        }

        skipped.sort_by_key(|s| s.index);
        let records: Vec<_> = slots.into_iter().flatten().collect();
        debug_assert_eq!(records.len() + skipped.len(), total);

        info!(enriched = records.len(), skipped = skipped.len(), "batch complete");
        Ok(BatchOutcome {
            run_id,
            records,
            skipped,
        })
    }
}

fn fetch_records(source: &dyn ReviewSource) -> Result<Vec<ReviewRecord>, SourceError> {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(|| source.fetch()),
        _ => source.fetch(),
    }
}
