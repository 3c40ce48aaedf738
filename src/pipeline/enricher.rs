//! Record enricher: one ReviewRecord → one EnrichedReviewRecord

use crate::classify::{ClassifyError, Rating};
use crate::review::{EnrichedReviewRecord, ReviewRecord};
use crate::scorer::{ScoreAdapter, ScorerError};
use thiserror::Error;
use tracing::trace;

/// Why a single record could not be enriched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnrichErrorKind {
    #[error(transparent)]
    InvalidRating(#[from] ClassifyError),
    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

/// A failed enrichment, tagged with the review it belongs to.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("review {review_id}: {kind}")]
pub struct EnrichError {
    pub review_id: i64,
    pub kind: EnrichErrorKind,
}

impl EnrichError {
    pub fn new(review_id: i64, kind: impl Into<EnrichErrorKind>) -> Self {
        Self {
            review_id,
            kind: kind.into(),
        }
    }

    pub fn is_invalid_rating(&self) -> bool {
        matches!(self.kind, EnrichErrorKind::InvalidRating(_))
    }
}

/// Applies the score adapter, categorizer and bucketizer to a review.
///
/// Holds no per-record state; share one instance (behind an `Arc`) across
/// every task of a batch.
#[derive(Debug, Clone)]
pub struct RecordEnricher {
    adapter: ScoreAdapter,
}

impl RecordEnricher {
    pub fn new(adapter: ScoreAdapter) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &ScoreAdapter {
        &self.adapter
    }

    /// Enrich one review.
    ///
    /// The rating is validated before the scorer is consulted, so an
    /// invalid record never costs a scorer call. Either all three derived
    /// fields are attached or an error is returned.
    pub async fn enrich(&self, review: ReviewRecord) -> Result<EnrichedReviewRecord, EnrichError> {
        let rating =
            Rating::new(review.rating).map_err(|e| EnrichError::new(review.review_id, e))?;
        let score = self
            .adapter
            .score(&review.review_text)
            .await
            .map_err(|e| EnrichError::new(review.review_id, e))?;

        let enriched = EnrichedReviewRecord::assemble(review, rating, score);
        trace!(
            review_id = enriched.review_id(),
            score = enriched.sentiment_score(),
            category = %enriched.sentiment_category(),
            bucket = %enriched.sentiment_bucket(),
            "enriched review"
        );
        Ok(enriched)
    }
}
