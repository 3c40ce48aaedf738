//! Bucketizer: score → range label for histogram-style reporting

use serde::{Deserialize, Serialize};

/// Coarse range label over the compound score.
///
/// The labels are fixed strings consumed by downstream reports; they are
/// not derived from the thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SentimentBucket {
    /// score ≥ 0.5
    #[serde(rename = "0.5 to 1.0")]
    StronglyPositive,
    /// 0.0 ≤ score < 0.5
    #[serde(rename = "0.0 to 0.49")]
    MildlyPositive,
    /// -0.5 < score < 0.0
    #[serde(rename = "-0.49 to 0.0")]
    MildlyNegative,
    /// score ≤ -0.5
    #[serde(rename = "-1.0 to -0.5")]
    StronglyNegative,
}

impl SentimentBucket {
    pub const ALL: [SentimentBucket; 4] = [
        Self::StronglyPositive,
        Self::MildlyPositive,
        Self::MildlyNegative,
        Self::StronglyNegative,
    ];

    /// The label written to the output table
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StronglyPositive => "0.5 to 1.0",
            Self::MildlyPositive => "0.0 to 0.49",
            Self::MildlyNegative => "-0.49 to 0.0",
            Self::StronglyNegative => "-1.0 to -0.5",
        }
    }
}

impl std::fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assign a score to its range bucket.
///
/// -0.5 itself belongs to the strongly negative bucket, mirroring 0.5 on the
/// positive side. The legacy report bucketed with `-0.5 <= score < 0.0`,
/// which put -0.5 in "-0.49 to 0.0"; tables it produced differ from this one
/// only for scores of exactly -0.5.
///
/// Scores outside [-1, 1] land in the outermost buckets; the score adapter
/// rejects them before they get here.
pub fn bucket(score: f64) -> SentimentBucket {
    if score >= 0.5 {
        SentimentBucket::StronglyPositive
    } else if score >= 0.0 {
        SentimentBucket::MildlyPositive
    } else if score > -0.5 {
        SentimentBucket::MildlyNegative
    } else {
        SentimentBucket::StronglyNegative
    }
}
