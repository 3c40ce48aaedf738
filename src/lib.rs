//! review-sentiment: Sentiment Classification & Bucketing Pipeline
//!
//! Enriches customer review records with derived sentiment signals and
//! writes a denormalized, analysis-ready table.
//!
//! # Core Concepts
//!
//! - **Score**: a compound polarity in [-1.0, 1.0] computed from review text
//! - **Category**: a label combining the text score with the star rating
//! - **Bucket**: a coarse range label over the score for histogram reporting
//!
//! Data flows one way: [`ReviewSource`] → [`BatchOrchestrator`] →
//! [`RecordEnricher`] → [`OutputSink`].
//!
//! # Example
//!
//! ```
//! use review_sentiment::{bucket, categorize, Rating, SentimentBucket, SentimentCategory};
//!
//! let rating = Rating::new(3).unwrap();
//! assert_eq!(categorize(0.3, rating), SentimentCategory::MixedPositive);
//! assert_eq!(bucket(0.49), SentimentBucket::MildlyPositive);
//! ```

pub mod classify;
pub mod config;
pub mod pipeline;
mod review;
pub mod scorer;
pub mod sink;
pub mod source;

pub use classify::{
    bucket, categorize, ClassifyError, Rating, RatingBand, ScoreBand, SentimentBucket,
    SentimentCategory,
};
pub use config::{ConfigError, PipelineConfig, ScorerConfig, SourceConfig};
pub use pipeline::{
    BatchOrchestrator, BatchOutcome, BatchSummary, EnrichError, EnrichErrorKind, ErrorPolicy,
    PipelineError, RecordEnricher, SkippedRecord,
};
pub use review::{parse_review_date, EnrichedReviewRecord, ReviewRecord};
pub use scorer::{LexiconScorer, MockScorer, ScoreAdapter, ScorerError, SentimentScorer};
pub use sink::{CsvSink, OutputSink, SinkError, OUTPUT_HEADER};
pub use source::{CsvReviewSource, ReviewSource, SourceError, SqliteReviewSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
