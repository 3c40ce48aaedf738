//! Mock scorer for testing: returns preconfigured scores and failures.

use super::traits::{ScorerError, SentimentScorer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

/// Scripted scorer.
///
/// Texts with a registered response get that response; everything else
/// gets the default score. Can also simulate an outage for the first N
/// calls and a fixed per-call latency.
pub struct MockScorer {
    default_score: f64,
    responses: HashMap<String, Result<f64, ScorerError>>,
    outage_calls: AtomicU32,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockScorer {
    /// A scorer that returns `score` for any text.
    pub fn constant(score: f64) -> Self {
        Self {
            default_score: score,
            responses: HashMap::new(),
            outage_calls: AtomicU32::new(0),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Register a response for an exact text.
    pub fn with_response(
        mut self,
        text: impl Into<String>,
        response: Result<f64, ScorerError>,
    ) -> Self {
        self.responses.insert(text.into(), response);
        self
    }

    /// Register a score for an exact text.
    pub fn with_score(self, text: impl Into<String>, score: f64) -> Self {
        self.with_response(text, Ok(score))
    }

    /// The next `calls` calls fail with `Unavailable`.
    pub fn failing_first(self, calls: u32) -> Self {
        self.outage_calls.store(calls, Ordering::SeqCst);
        self
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `score` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentScorer for MockScorer {
    fn id(&self) -> &str {
        "mock"
    }

    async fn score(&self, text: &str) -> Result<f64, ScorerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let in_outage = self
            .outage_calls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if in_outage {
            return Err(ScorerError::Unavailable("mock outage".into()));
        }

        self.responses
            .get(text)
            .cloned()
            .unwrap_or(Ok(self.default_score))
    }
}
