//! Results of a batch run

use crate::classify::{SentimentBucket, SentimentCategory};
use crate::review::EnrichedReviewRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// A record excluded from the output under `ErrorPolicy::SkipInvalid`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Position in the input batch
    pub index: usize,
    pub review_id: i64,
    pub reason: String,
}

/// Everything a batch run produced.
///
/// `records` is in input order. Every input record appears exactly once,
/// either in `records` or in `skipped`.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub run_id: Uuid,
    pub records: Vec<EnrichedReviewRecord>,
    pub skipped: Vec<SkippedRecord>,
}

impl BatchOutcome {
    /// Number of input records the run accounted for
    pub fn input_len(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn summary(&self) -> BatchSummary {
        let mut by_category = BTreeMap::new();
        let mut by_bucket = BTreeMap::new();
        for record in &self.records {
            *by_category.entry(record.sentiment_category()).or_insert(0) += 1;
            *by_bucket.entry(record.sentiment_bucket()).or_insert(0) += 1;
        }
        BatchSummary {
            run_id: self.run_id,
            total: self.input_len(),
            written: self.records.len(),
            skipped: self.skipped.len(),
            by_category,
            by_bucket,
        }
    }
}

/// Counts for reporting a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub run_id: Uuid,
    pub total: usize,
    pub written: usize,
    pub skipped: usize,
    pub by_category: BTreeMap<SentimentCategory, usize>,
    pub by_bucket: BTreeMap<SentimentBucket, usize>,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "run {}: {} reviews, {} written, {} skipped",
            self.run_id, self.total, self.written, self.skipped
        )?;
        for category in SentimentCategory::ALL {
            let count = self.by_category.get(&category).copied().unwrap_or(0);
            writeln!(f, "  {:<16} {:>7}", category.as_str(), count)?;
        }
        for bucket in SentimentBucket::ALL {
            let count = self.by_bucket.get(&bucket).copied().unwrap_or(0);
            writeln!(f, "  {:<16} {:>7}", bucket.as_str(), count)?;
        }
        Ok(())
    }
}
