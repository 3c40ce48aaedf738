//! Review records: the ingested input row and its enriched counterpart

mod record;

pub use record::{parse_review_date, EnrichedReviewRecord, ReviewRecord, DATE_FORMAT};
