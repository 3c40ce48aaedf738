//! Rule engines over the sentiment score
//!
//! Both rules are pure functions: the categorizer combines the text score
//! with the star rating, the bucketizer looks at the score alone.

mod bucket;
mod category;

pub use bucket::{bucket, SentimentBucket};
pub use category::{
    categorize, category_for, ClassifyError, Rating, RatingBand, ScoreBand, SentimentCategory,
    NEUTRAL_THRESHOLD,
};
