//! CSV sink: comma-delimited UTF-8, header row, no index column

use super::{OutputSink, SinkError};
use crate::review::{EnrichedReviewRecord, DATE_FORMAT};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column order of the enriched table
pub const OUTPUT_HEADER: [&str; 9] = [
    "ReviewID",
    "CustomerID",
    "ProductID",
    "ReviewDate",
    "Rating",
    "ReviewText",
    "SentimentScore",
    "SentimentCategory",
    "SentimentBucket",
];

/// Render a score as a plain decimal that always carries a fractional part
/// (`1.0`, `0.0`, `-0.4404`); never exponent notation.
pub fn format_score(score: f64) -> String {
    let rendered = score.to_string();
    if rendered.contains('.') || !score.is_finite() {
        rendered
    } else {
        format!("{}.0", rendered)
    }
}

/// Writes the enriched table as CSV.
///
/// Fields are quoted only when needed (delimiter, quote, or line break in
/// the value); embedded quotes are doubled.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl CsvSink<File> {
    /// Create (or truncate) `path` and write the table there.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(Self::new(File::create(path)?))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(inner),
            header_written: false,
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }

    fn write_row(&mut self, record: &EnrichedReviewRecord) -> Result<(), SinkError> {
        let review = record.review();
        self.writer.write_record([
            review.review_id.to_string().as_str(),
            review.customer_id.to_string().as_str(),
            review.product_id.to_string().as_str(),
            review.review_date.format(DATE_FORMAT).to_string().as_str(),
            review.rating.to_string().as_str(),
            review.review_text.as_str(),
            format_score(record.sentiment_score()).as_str(),
            record.sentiment_category().as_str(),
            record.sentiment_bucket().as_str(),
        ])?;
        Ok(())
    }
}

impl<W: Write + Send> OutputSink for CsvSink<W> {
    fn write_table(&mut self, records: &[EnrichedReviewRecord]) -> Result<(), SinkError> {
        if !self.header_written {
            self.writer.write_record(OUTPUT_HEADER)?;
            self.header_written = true;
        }
        for record in records {
            self.write_row(record)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewRecord;
    use chrono::NaiveDate;

    fn enriched(id: i64, rating: i64, text: &str, score: f64) -> EnrichedReviewRecord {
        let review = ReviewRecord::new(
            id,
            id * 10,
            id * 100,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            rating,
            text,
        );
        EnrichedReviewRecord::from_score(review, score).unwrap()
    }

    fn render(records: &[EnrichedReviewRecord]) -> String {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_table(records).unwrap();
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn header_and_rows() {
        let out = render(&[enriched(1, 5, "Great value", 0.6249), enriched(2, 3, "ok I guess", 0.0)]);
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(
            lines[0],
            "ReviewID,CustomerID,ProductID,ReviewDate,Rating,ReviewText,SentimentScore,SentimentCategory,SentimentBucket"
        );
        assert_eq!(lines[1], "1,10,100,2024-01-15,5,Great value,0.6249,Positive,0.5 to 1.0");
        assert_eq!(lines[2], "2,20,200,2024-01-15,3,ok I guess,0.0,Neutral,0.0 to 0.49");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_batch_writes_header_only() {
        let out = render(&[]);
        assert_eq!(out, format!("{}\n", OUTPUT_HEADER.join(",")));
    }

    #[test]
    fn quotes_text_with_delimiters_quotes_and_newlines() {
        let out = render(&[
            enriched(1, 2, "Cheap, flimsy", -0.5),
            enriched(2, 4, "They said \"sturdy\"", 0.1),
            enriched(3, 1, "line one\nline two", -0.9),
        ]);

        assert!(out.contains("1,10,100,2024-01-15,2,\"Cheap, flimsy\",-0.5,Negative,-1.0 to -0.5\n"));
        assert!(out.contains(",\"They said \"\"sturdy\"\"\",0.1,Positive,0.0 to 0.49\n"));
        assert!(out.contains(",\"line one\nline two\",-0.9,Negative,-1.0 to -0.5\n"));

        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let texts: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[5].to_string())
            .collect();
        assert_eq!(texts, vec!["Cheap, flimsy", "They said \"sturdy\"", "line one\nline two"]);
    }

    #[test]
    fn repeated_writes_append_without_second_header() {
        let mut sink = CsvSink::new(Vec::new());
        sink.write_table(&[enriched(1, 5, "a", 0.2)]).unwrap();
        sink.write_table(&[enriched(2, 5, "b", 0.2)]).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert_eq!(out.lines().count(), 3);
        assert_eq!(out.matches("ReviewID").count(), 1);
    }

    #[test]
    fn score_formatting() {
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(-1.0), "-1.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.4404), "0.4404");
        assert_eq!(format_score(-0.0516), "-0.0516");
        assert_eq!(format_score(1e-7), "0.0000001");
    }

    #[test]
    fn create_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("reviews.csv");
        let mut sink = CsvSink::create(&path).unwrap();
        sink.write_table(&[enriched(1, 4, "nice", 0.42)]).unwrap();
        drop(sink);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("1,10,100,2024-01-15,4,nice,0.42,Positive,0.0 to 0.49\n"));
    }
}
