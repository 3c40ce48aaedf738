//! ReviewRecord and EnrichedReviewRecord

use crate::classify::{bucket, categorize, ClassifyError, Rating, SentimentBucket, SentimentCategory};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar date format used on both sides of the pipeline.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a review date.
///
/// Accepts a plain `YYYY-MM-DD` date, or a datetime whose first ten
/// characters are the date followed by a space or `T` separator (as SQL
/// drivers commonly render `DATETIME` columns). The time part is dropped.
pub fn parse_review_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    let date_part = match raw.char_indices().nth(10) {
        Some((idx, ' ' | 'T')) => &raw[..idx],
        _ => raw,
    };
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

mod review_date {
    use super::{parse_review_date, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_review_date(&raw).map_err(de::Error::custom)
    }
}

/// One customer review as supplied by a review source.
///
/// Field names serialize to the source table's column names
/// (`ReviewID`, `CustomerID`, ...). The rating is carried as ingested;
/// it is validated only when the record is enriched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "ReviewID")]
    pub review_id: i64,
    #[serde(rename = "CustomerID")]
    pub customer_id: i64,
    #[serde(rename = "ProductID")]
    pub product_id: i64,
    #[serde(rename = "ReviewDate", with = "review_date")]
    pub review_date: NaiveDate,
    #[serde(rename = "Rating")]
    pub rating: i64,
    #[serde(rename = "ReviewText", default)]
    pub review_text: String,
}

impl ReviewRecord {
    pub fn new(
        review_id: i64,
        customer_id: i64,
        product_id: i64,
        review_date: NaiveDate,
        rating: i64,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            review_id,
            customer_id,
            product_id,
            review_date,
            rating,
            review_text: review_text.into(),
        }
    }
}

/// A review plus its three derived sentiment fields.
///
/// Built once per input record and never mutated afterward, so the fields
/// are only reachable through accessors. The category and bucket are always
/// consistent with the stored score and rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedReviewRecord {
    #[serde(flatten)]
    review: ReviewRecord,
    #[serde(rename = "SentimentScore")]
    sentiment_score: f64,
    #[serde(rename = "SentimentCategory")]
    sentiment_category: SentimentCategory,
    #[serde(rename = "SentimentBucket")]
    sentiment_bucket: SentimentBucket,
}

impl EnrichedReviewRecord {
    /// Derive category and bucket for `review` given its text score.
    ///
    /// Fails with `InvalidRating` when the review's rating is outside 1..=5.
    pub fn from_score(review: ReviewRecord, score: f64) -> Result<Self, ClassifyError> {
        let rating = Rating::new(review.rating)?;
        Ok(Self::assemble(review, rating, score))
    }

    /// Build from an already validated rating.
    pub(crate) fn assemble(review: ReviewRecord, rating: Rating, score: f64) -> Self {
        Self {
            sentiment_category: categorize(score, rating),
            sentiment_bucket: bucket(score),
            sentiment_score: score,
            review,
        }
    }

    /// The original review, unchanged
    pub fn review(&self) -> &ReviewRecord {
        &self.review
    }

    pub fn review_id(&self) -> i64 {
        self.review.review_id
    }

    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn sentiment_category(&self) -> SentimentCategory {
        self.sentiment_category
    }

    pub fn sentiment_bucket(&self) -> SentimentBucket {
        self.sentiment_bucket
    }

    /// Give back the original review, dropping the derived fields.
    pub fn into_review(self) -> ReviewRecord {
        self.review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> ReviewRecord {
        ReviewRecord::new(7, 11, 13, date(2024, 3, 9), 4, "Works great, shipped fast")
    }

    #[test]
    fn parse_plain_date() {
        assert_eq!(parse_review_date("2023-12-31").unwrap(), date(2023, 12, 31));
    }

    #[test]
    fn parse_datetime_drops_time() {
        assert_eq!(parse_review_date("2023-12-31 23:59:59").unwrap(), date(2023, 12, 31));
        assert_eq!(parse_review_date("2023-12-31T08:00:00.000").unwrap(), date(2023, 12, 31));
        assert_eq!(parse_review_date(" 2023-01-02 ").unwrap(), date(2023, 1, 2));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_review_date("31/12/2023").is_err());
        assert!(parse_review_date("").is_err());
        assert!(parse_review_date("2023-12-31X00").is_err());
    }

    #[test]
    fn record_uses_column_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "ReviewID": 7,
                "CustomerID": 11,
                "ProductID": 13,
                "ReviewDate": "2024-03-09",
                "Rating": 4,
                "ReviewText": "Works great, shipped fast"
            })
        );
    }

    #[test]
    fn record_text_defaults_to_empty() {
        let record: ReviewRecord = serde_json::from_value(json!({
            "ReviewID": 1,
            "CustomerID": 2,
            "ProductID": 3,
            "ReviewDate": "2024-01-05 10:30:00",
            "Rating": 5
        }))
        .unwrap();
        assert_eq!(record.review_text, "");
        assert_eq!(record.review_date, date(2024, 1, 5));
    }

    #[test]
    fn enrichment_preserves_original_fields() {
        let original = sample();
        let enriched = EnrichedReviewRecord::from_score(original.clone(), 0.62).unwrap();

        assert_eq!(enriched.review(), &original);
        assert_eq!(enriched.sentiment_score(), 0.62);
        assert_eq!(enriched.sentiment_category(), SentimentCategory::Positive);
        assert_eq!(enriched.sentiment_bucket(), SentimentBucket::StronglyPositive);
        assert_eq!(enriched.into_review(), original);
    }

    #[test]
    fn enrichment_adds_exactly_three_fields() {
        let enriched = EnrichedReviewRecord::from_score(sample(), -0.2).unwrap();
        let value = serde_json::to_value(&enriched).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 9);
        assert_eq!(object["SentimentScore"], json!(-0.2));
        assert_eq!(object["SentimentCategory"], json!("Mixed Positive"));
        assert_eq!(object["SentimentBucket"], json!("-0.49 to 0.0"));
    }

    #[test]
    fn enrichment_rejects_invalid_rating() {
        let mut record = sample();
        record.rating = 6;
        let err = EnrichedReviewRecord::from_score(record, 0.1).unwrap_err();
        assert_eq!(err, ClassifyError::InvalidRating(6));
    }
}
