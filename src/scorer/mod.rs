//! Sentiment scoring boundary
//!
//! A `SentimentScorer` maps free text to a compound score. The pipeline
//! never calls a scorer directly; it goes through `ScoreAdapter`, which
//! enforces the score contract and owns timeout and retry policy.
//!
//! Implementations:
//! - `LexiconScorer`: word-list compound scorer (production default)
//! - `MockScorer`: scripted scores and failures (testing)

mod adapter;
mod lexicon;
mod mock;
mod traits;

pub use adapter::{ScoreAdapter, NEUTRAL_SCORE};
pub use lexicon::{LexiconError, LexiconScorer};
pub use mock::MockScorer;
pub use traits::{ScorerError, SentimentScorer};
