//! ScoreAdapter: contract enforcement around a SentimentScorer
//!
//! Empty text short-circuits to the neutral score. Every call is bounded
//! by an optional timeout, transient failures are retried a bounded number
//! of times, and out-of-range output is rejected rather than bucketed.

use super::traits::{ScorerError, SentimentScorer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Score assigned to empty review text
pub const NEUTRAL_SCORE: f64 = 0.0;

/// Wraps a scorer with the pipeline's score contract.
///
/// Cloning is cheap; clones share the underlying scorer.
#[derive(Clone)]
pub struct ScoreAdapter {
    scorer: Arc<dyn SentimentScorer>,
    timeout: Option<Duration>,
    max_retries: u32,
}

impl ScoreAdapter {
    /// Wrap a scorer with no timeout and no retries.
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self {
            scorer,
            timeout: None,
            max_retries: 0,
        }
    }

    /// Bound each scorer call; an expired call counts as `Unavailable`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Extra attempts after a transient failure.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn scorer_id(&self) -> &str {
        self.scorer.id()
    }

    /// Score review text under the contract.
    ///
    /// Returns a value in [-1.0, 1.0]. Empty or whitespace-only text yields
    /// [`NEUTRAL_SCORE`] without consulting the scorer.
    pub async fn score(&self, text: &str) -> Result<f64, ScorerError> {
        if text.trim().is_empty() {
            return Ok(NEUTRAL_SCORE);
        }

        let mut retries = 0;
        loop {
            match self.attempt(text).await {
                Ok(score) => return check_contract(score),
                Err(err) if err.is_transient() && retries < self.max_retries => {
                    retries += 1;
                    warn!(
                        scorer = self.scorer.id(),
                        retry = retries,
                        max_retries = self.max_retries,
                        error = %err,
                        "transient scorer error, retrying"
                    );
                }
                Err(err) => {
                    debug!(scorer = self.scorer.id(), error = %err, "scorer call failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt(&self, text: &str) -> Result<f64, ScorerError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.scorer.score(text))
                .await
                .map_err(|_| {
                    ScorerError::Unavailable(format!("timed out after {}ms", limit.as_millis()))
                })?,
            None => self.scorer.score(text).await,
        }
    }
}

impl std::fmt::Debug for ScoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreAdapter")
            .field("scorer", &self.scorer.id())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

fn check_contract(score: f64) -> Result<f64, ScorerError> {
    if !(-1.0..=1.0).contains(&score) {
        return Err(ScorerError::OutOfRange(score));
    }
    // Fold -0.0 into 0.0 so it serializes as "0.0".
    Ok(if score == 0.0 { 0.0 } else { score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::MockScorer;

    fn adapter(mock: MockScorer) -> (Arc<MockScorer>, ScoreAdapter) {
        let mock = Arc::new(mock);
        let adapter = ScoreAdapter::new(mock.clone());
        (mock, adapter)
    }

    #[tokio::test]
    async fn empty_text_is_neutral_without_scorer_call() {
        let (mock, adapter) = adapter(MockScorer::constant(0.9));

        assert_eq!(adapter.score("").await.unwrap(), NEUTRAL_SCORE);
        assert_eq!(adapter.score("   \n\t").await.unwrap(), NEUTRAL_SCORE);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn passes_through_in_range_scores() {
        let (mock, adapter) = adapter(
            MockScorer::constant(0.0)
                .with_score("love it", 0.6369)
                .with_score("hate it", -1.0),
        );

        assert_eq!(adapter.score("love it").await.unwrap(), 0.6369);
        assert_eq!(adapter.score("hate it").await.unwrap(), -1.0);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn negative_zero_is_normalized() {
        let (_, adapter) = adapter(MockScorer::constant(-0.0));
        let score = adapter.score("meh").await.unwrap();
        assert!(score.is_sign_positive());
    }

    #[tokio::test]
    async fn rejects_out_of_range_output() {
        let (_, adapter) = adapter(
            MockScorer::constant(0.0)
                .with_score("too high", 1.2)
                .with_score("too low", -1.0001)
                .with_score("nan", f64::NAN),
        );

        assert_eq!(adapter.score("too high").await, Err(ScorerError::OutOfRange(1.2)));
        assert_eq!(adapter.score("too low").await, Err(ScorerError::OutOfRange(-1.0001)));
        assert!(matches!(adapter.score("nan").await, Err(ScorerError::OutOfRange(v)) if v.is_nan()));
    }

    #[tokio::test]
    async fn timeout_maps_to_unavailable() {
        let (_, adapter) = adapter(MockScorer::constant(0.5).with_delay(Duration::from_millis(500)));
        let adapter = adapter.with_timeout(Duration::from_millis(10));

        let err = adapter.score("slow").await.unwrap_err();
        assert!(matches!(err, ScorerError::Unavailable(_)));
    }

    #[tokio::test]
    async fn retries_transient_failures() {
        let (mock, adapter) = adapter(MockScorer::constant(0.4).failing_first(2));
        let adapter = adapter.with_max_retries(2);

        assert_eq!(adapter.score("eventually").await.unwrap(), 0.4);
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let (mock, adapter) = adapter(MockScorer::constant(0.4).failing_first(5));
        let adapter = adapter.with_max_retries(1);

        let err = adapter.score("never").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn does_not_retry_hard_failures() {
        let (mock, adapter) = adapter(
            MockScorer::constant(0.0)
                .with_response("broken", Err(ScorerError::Failure("bad input".into()))),
        );
        let adapter = adapter.with_max_retries(3);

        let err = adapter.score("broken").await.unwrap_err();
        assert_eq!(err, ScorerError::Failure("bad input".into()));
        assert_eq!(mock.call_count(), 1);
    }
}
