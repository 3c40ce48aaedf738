//! SQLite review source

use super::traits::{ReviewSource, SourceError, SourceResult};
use crate::review::{parse_review_date, ReviewRecord};
use rusqlite::{Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Query used when none is configured. Columns are read by name, so a
/// custom query may reorder them but must keep these aliases.
pub const DEFAULT_QUERY: &str = "SELECT ReviewID, CustomerID, ProductID, ReviewDate, Rating, ReviewText \
     FROM customer_reviews ORDER BY ReviewID";

/// Reads reviews from a SQLite database.
///
/// The database is opened read-only; the source never writes. Thread-safe
/// via internal mutex on the connection.
pub struct SqliteReviewSource {
    conn: Mutex<Connection>,
    query: String,
    label: String,
}

impl SqliteReviewSource {
    /// Open an existing database file read-only.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
            query: DEFAULT_QUERY.to_string(),
            label: path.display().to_string(),
        })
    }

    /// Wrap an already open connection (useful for in-memory databases).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            query: DEFAULT_QUERY.to_string(),
            label: "sqlite connection".to_string(),
        }
    }

    /// Replace the select statement.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A row as stored, before the date is parsed
struct RawRow {
    review_id: i64,
    customer_id: i64,
    product_id: i64,
    review_date: String,
    rating: i64,
    review_text: Option<String>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            review_id: row.get("ReviewID")?,
            customer_id: row.get("CustomerID")?,
            product_id: row.get("ProductID")?,
            review_date: row.get("ReviewDate")?,
            rating: row.get("Rating")?,
            review_text: row.get("ReviewText")?,
        })
    }

    fn into_record(self) -> SourceResult<ReviewRecord> {
        let review_date =
            parse_review_date(&self.review_date).map_err(|e| SourceError::Parse {
                review_id: self.review_id,
                column: "ReviewDate",
                reason: format!("'{}': {}", self.review_date, e),
            })?;
        Ok(ReviewRecord {
            review_id: self.review_id,
            customer_id: self.customer_id,
            product_id: self.product_id,
            review_date,
            rating: self.rating,
            review_text: self.review_text.unwrap_or_default(),
        })
    }
}

impl ReviewSource for SqliteReviewSource {
    fn describe(&self) -> String {
        format!("sqlite:{}", self.label)
    }

    fn fetch(&self) -> SourceResult<Vec<ReviewRecord>> {
        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stmt = conn.prepare(&self.query)?;
        let rows = stmt
            .query_map([], RawRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let records = rows
            .into_iter()
            .map(RawRow::into_record)
            .collect::<SourceResult<Vec<_>>>()?;
        debug!(source = %self.label, rows = records.len(), "fetched reviews");
        Ok(records)
    }
}
