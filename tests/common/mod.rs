//! Shared fixtures for the pipeline integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::Rng;
use review_sentiment::{ReviewRecord, ScorerError, SentimentScorer};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
    CREATE TABLE customer_reviews (
        ReviewID INTEGER PRIMARY KEY,
        CustomerID INTEGER NOT NULL,
        ProductID INTEGER NOT NULL,
        ReviewDate TEXT NOT NULL,
        Rating INTEGER NOT NULL,
        ReviewText TEXT
    );
"#;

/// Five reviews covering every score band and rating band.
pub const SAMPLE_ROWS: &str = r#"
    INSERT INTO customer_reviews VALUES (1, 11, 101, '2024-01-03', 5, 'Great product!');
    INSERT INTO customer_reviews VALUES (2, 12, 102, '2024-01-04', 1, 'Bad');
    INSERT INTO customer_reviews VALUES (3, 13, 103, '2024-01-05 17:42:00', 3, NULL);
    INSERT INTO customer_reviews VALUES (4, 14, 104, '2024-01-06', 4, 'terrible');
    INSERT INTO customer_reviews VALUES (5, 15, 105, '2024-01-07', 2, 'good');
"#;

/// A temporary SQLite database holding a `customer_reviews` table.
pub struct ReviewDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl ReviewDb {
    /// Create the table and run `rows` (INSERT statements) against it.
    pub fn with_rows(rows: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reviews.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(rows).unwrap();
        Self { dir, path }
    }

    pub fn sample() -> Self {
        Self::with_rows(SAMPLE_ROWS)
    }

    /// Path for an output file inside the fixture directory
    pub fn output_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// `count` valid reviews with distinct text, ids starting at 1.
pub fn reviews(count: usize) -> Vec<ReviewRecord> {
    let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    (1..=count as i64)
        .map(|id| ReviewRecord::new(id, id * 7, id % 13, date, id % 5 + 1, format!("review number {id}")))
        .collect()
}

/// Scorer whose output is a pure function of the text but whose latency
/// is random, so completion order differs from submission order.
pub struct JitterScorer {
    max_delay_ms: u64,
}

impl JitterScorer {
    pub fn new(max_delay_ms: u64) -> Self {
        Self { max_delay_ms }
    }

    /// Score the scorer assigns to `text`
    pub fn expected(text: &str) -> f64 {
        let hash = text.bytes().fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        (hash % 2001) as f64 / 1000.0 - 1.0
    }
}

#[async_trait]
impl SentimentScorer for JitterScorer {
    fn id(&self) -> &str {
        "jitter"
    }

    async fn score(&self, text: &str) -> Result<f64, ScorerError> {
        let delay = rand::thread_rng().gen_range(0..=self.max_delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(Self::expected(text))
    }
}
