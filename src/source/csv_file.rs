//! CSV review source

use super::traits::{ReviewSource, SourceResult};
use crate::review::ReviewRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads reviews from a CSV file with a header row naming the input
/// columns (`ReviewID,CustomerID,ProductID,ReviewDate,Rating,ReviewText`).
/// Column order in the file does not matter; extra columns are ignored.
#[derive(Debug, Clone)]
pub struct CsvReviewSource {
    path: PathBuf,
}

impl CsvReviewSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReviewSource for CsvReviewSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn fetch(&self) -> SourceResult<Vec<ReviewRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for row in reader.deserialize::<ReviewRecord>() {
            records.push(row?);
        }
        debug!(source = %self.path.display(), rows = records.len(), "fetched reviews");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_rows_in_file_order() {
        let file = csv_file(
            "ReviewID,CustomerID,ProductID,ReviewDate,Rating,ReviewText\n\
             9,1,2,2024-02-01,4,\"Solid, well made\"\n\
             4,3,2,2024-02-03,1,\n",
        );
        let records = CsvReviewSource::new(file.path()).fetch().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].review_id, 9);
        assert_eq!(records[0].review_text, "Solid, well made");
        assert_eq!(records[1].review_id, 4);
        assert_eq!(records[1].review_text, "");
    }

    #[test]
    fn column_order_is_by_name() {
        let file = csv_file(
            "Rating, ReviewText ,ReviewDate,ProductID,CustomerID,ReviewID\n\
             5,Great,2024-02-01 12:00:00,7,8,1\n",
        );
        let records = CsvReviewSource::new(file.path()).fetch().unwrap();
        assert_eq!(records[0].review_id, 1);
        assert_eq!(records[0].customer_id, 8);
        assert_eq!(records[0].product_id, 7);
        assert_eq!(records[0].rating, 5);
    }

    #[test]
    fn malformed_row_is_an_error() {
        let file = csv_file(
            "ReviewID,CustomerID,ProductID,ReviewDate,Rating,ReviewText\n\
             1,1,1,2024-02-01,five,meh\n",
        );
        let err = CsvReviewSource::new(file.path()).fetch().unwrap_err();
        assert!(matches!(err, SourceError::Csv(_)));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(CsvReviewSource::new("/no/such/reviews.csv").fetch().is_err());
    }
}
