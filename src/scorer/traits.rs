//! SentimentScorer trait, the contract scorers implement

use async_trait::async_trait;
use thiserror::Error;

/// Errors from scoring a piece of text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScorerError {
    /// The scorer could not be reached or timed out. Transient.
    #[error("scorer unavailable: {0}")]
    Unavailable(String),
    /// The scorer ran and failed. Not retried.
    #[error("scorer failure: {0}")]
    Failure(String),
    /// The scorer returned a value outside [-1.0, 1.0] (or NaN).
    #[error("scorer returned {0}, outside [-1.0, 1.0]")]
    OutOfRange(f64),
}

impl ScorerError {
    /// True for errors worth retrying at the adapter boundary
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// A text → compound sentiment score function.
///
/// Implementations must be deterministic for a fixed configuration and
/// return values in [-1.0, 1.0]. Any expensive setup (loading a lexicon,
/// opening a connection) belongs in the constructor so that a single
/// instance can be shared across a whole batch.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Stable identifier used in logs
    fn id(&self) -> &str;

    /// Score `text`. Negative = unfavorable, positive = favorable.
    async fn score(&self, text: &str) -> Result<f64, ScorerError>;
}
