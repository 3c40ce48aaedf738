//! Categorizer: (score, rating) → SentimentCategory
//!
//! The rule is an explicit 3×3 table indexed by score band and rating band,
//! so every cell can be audited and tested on its own.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scores strictly above this are positive text; strictly below its
/// negation are negative text. Exactly ±0.05 is neutral.
pub const NEUTRAL_THRESHOLD: f64 = 0.05;

/// Errors from classification input validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    #[error("invalid rating {0}: expected 1..=5")]
    InvalidRating(i64),
}

/// A star rating known to lie in 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    /// Validate a raw rating. Out-of-range values are rejected, never clamped.
    pub fn new(raw: i64) -> Result<Self, ClassifyError> {
        if (Self::MIN..=Self::MAX).contains(&raw) {
            Ok(Self(raw as u8))
        } else {
            Err(ClassifyError::InvalidRating(raw))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = ClassifyError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse sentiment label combining text polarity and star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[serde(rename = "Positive")]
    Positive,
    #[serde(rename = "Negative")]
    Negative,
    #[serde(rename = "Mixed Positive")]
    MixedPositive,
    #[serde(rename = "Mixed Negative")]
    MixedNegative,
    #[serde(rename = "Neutral")]
    Neutral,
}

impl SentimentCategory {
    pub const ALL: [SentimentCategory; 5] = [
        Self::Positive,
        Self::Negative,
        Self::MixedPositive,
        Self::MixedNegative,
        Self::Neutral,
    ];

    /// The label written to the output table
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::MixedPositive => "Mixed Positive",
            Self::MixedNegative => "Mixed Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the neutral band a score falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    /// score > 0.05
    Positive,
    /// score < -0.05
    Negative,
    /// -0.05 ≤ score ≤ 0.05
    Neutral,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score > NEUTRAL_THRESHOLD {
            Self::Positive
        } else if score < -NEUTRAL_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
            Self::Neutral => 2,
        }
    }
}

/// Star rating partition used by the category table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingBand {
    /// 4 or 5 stars
    High,
    /// 3 stars
    Middle,
    /// 1 or 2 stars
    Low,
}

impl RatingBand {
    pub fn of(rating: Rating) -> Self {
        match rating.get() {
            4..=5 => Self::High,
            3 => Self::Middle,
            _ => Self::Low,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::High => 0,
            Self::Middle => 1,
            Self::Low => 2,
        }
    }
}

use SentimentCategory::{MixedNegative, MixedPositive, Negative, Neutral, Positive};

/// Rows: score band (positive, negative, neutral).
/// Columns: rating band (≥4, =3, ≤2).
const CATEGORY_TABLE: [[SentimentCategory; 3]; 3] = [
    [Positive, MixedPositive, MixedNegative],
    [MixedPositive, MixedNegative, Negative],
    [Positive, Neutral, Negative],
];

/// Look up the category cell for a score band and rating band.
pub fn category_for(score_band: ScoreBand, rating_band: RatingBand) -> SentimentCategory {
    CATEGORY_TABLE[score_band.index()][rating_band.index()]
}

/// Categorize a review from its text score and validated star rating.
pub fn categorize(score: f64, rating: Rating) -> SentimentCategory {
    category_for(ScoreBand::of(score), RatingBand::of(rating))
}
