//! Review sources
//!
//! A `ReviewSource` supplies the batch of review records to enrich.
//! `SqliteReviewSource` reads the `customer_reviews` table; `CsvReviewSource`
//! reads an exported table with the same column names.

mod csv_file;
mod sqlite;
mod traits;

pub use csv_file::CsvReviewSource;
pub use sqlite::{SqliteReviewSource, DEFAULT_QUERY};
pub use traits::{ReviewSource, SourceError, SourceResult};
