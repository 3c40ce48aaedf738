//! Lexicon-based compound scorer
//!
//! Sums per-word valences (negations flip and damp, boosters nudge away
//! from zero, a contrastive "but" reweights the two halves) and squashes
//! the sum into [-1, 1] with `x / sqrt(x² + 15)`.
//!
//! The lexicon is loaded once at construction and shared read-only.

use super::traits::{ScorerError, SentimentScorer};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Normalization constant for the compound squash
const NORMALIZATION_ALPHA: f64 = 15.0;
/// Multiplier applied to a valence preceded by a negation
const NEGATION_SCALAR: f64 = -0.74;
/// Dampening for boosters two and three words back
const BOOSTER_DISTANCE_SCALE: [f64; 3] = [1.0, 0.95, 0.9];
/// Added per exclamation mark, up to `MAX_EXCLAMATIONS`
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// Weight of words before / after a contrastive "but"
const BEFORE_BUT_WEIGHT: f64 = 0.5;
const AFTER_BUT_WEIGHT: f64 = 1.5;
/// How many preceding words can negate or boost a word
const LOOKBACK: usize = 3;

const BUILTIN_VALENCES: &[(&str, f64)] = &[
    // favorable
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("superb", 3.1),
    ("outstanding", 3.0),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("like", 2.0),
    ("liked", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("nice", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("pleased", 1.9),
    ("satisfied", 1.8),
    ("recommend", 1.5),
    ("recommended", 1.3),
    ("helpful", 1.8),
    ("comfortable", 1.5),
    ("easy", 1.9),
    ("beautiful", 2.9),
    ("impressive", 2.3),
    ("reliable", 1.9),
    ("worth", 0.9),
    ("fine", 0.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("thanks", 1.9),
    // unfavorable
    ("bad", -2.5),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("poor", -2.1),
    ("worst", -3.1),
    ("worse", -2.1),
    ("hate", -2.7),
    ("hated", -3.2),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("broken", -2.1),
    ("useless", -1.8),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("problem", -1.7),
    ("problems", -1.7),
    ("defective", -1.9),
    ("fail", -2.5),
    ("failed", -2.3),
    ("unhappy", -1.8),
    ("annoying", -1.7),
    ("frustrating", -1.9),
    ("flimsy", -1.3),
    ("mediocre", -1.0),
    ("sad", -2.1),
    ("angry", -2.3),
    ("uncomfortable", -1.6),
    ("difficult", -1.5),
    ("unreliable", -1.9),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "nor", "none", "nothing", "nobody", "nowhere", "cannot",
    "cant", "dont", "doesnt", "didnt", "isnt", "arent", "wasnt", "werent", "wont", "wouldnt",
    "shouldnt", "couldnt", "hasnt", "havent", "hadnt", "aint", "neednt", "mustnt", "without",
    "hardly", "rarely", "seldom",
];

const BOOSTERS: &[(&str, f64)] = &[
    ("very", 0.293),
    ("really", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("absolutely", 0.293),
    ("totally", 0.293),
    ("highly", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("truly", 0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("marginally", -0.293),
    ("partly", -0.293),
    ("kinda", -0.293),
    ("barely", -0.293),
];

/// Errors from loading a lexicon file
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("cannot read lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed lexicon line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("lexicon {0} has no entries")]
    Empty(PathBuf),
}

/// Word-list compound scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Scorer over the built-in review vocabulary.
    pub fn new() -> Self {
        Self::from_entries(BUILTIN_VALENCES.iter().map(|(w, v)| (*w, *v)))
    }

    /// Scorer over arbitrary (word, valence) pairs.
    ///
    /// Valences use the conventional -4..=4 intensity scale.
    pub fn from_entries<W: AsRef<str>>(entries: impl IntoIterator<Item = (W, f64)>) -> Self {
        let valences = entries
            .into_iter()
            .map(|(word, valence)| (word.as_ref().to_lowercase(), valence))
            .collect();
        Self { valences }
    }

    /// Load a tab-separated lexicon file (`token<TAB>mean_valence[<TAB>...]`).
    ///
    /// Trailing columns are ignored, as are blank lines and `#` comments.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut valences = HashMap::new();
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let token = fields.next().unwrap_or_default().trim();
            let raw = fields.next().ok_or_else(|| LexiconError::Malformed {
                line: idx + 1,
                reason: "missing valence column".into(),
            })?;
            let valence: f64 = raw.trim().parse().map_err(|e| LexiconError::Malformed {
                line: idx + 1,
                reason: format!("valence '{}': {}", raw.trim(), e),
            })?;
            if token.is_empty() || !valence.is_finite() {
                return Err(LexiconError::Malformed {
                    line: idx + 1,
                    reason: "empty token or non-finite valence".into(),
                });
            }
            valences.insert(token.to_lowercase(), valence);
        }

        if valences.is_empty() {
            return Err(LexiconError::Empty(path.to_path_buf()));
        }
        Ok(Self { valences })
    }

    /// Number of scored words in the lexicon
    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    /// Compound polarity of `text`, rounded to four decimals.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();

        let but_at = tokens.iter().position(|t| t == "but");
        let mut sum = 0.0;
        for (i, token) in tokens.iter().enumerate() {
            if booster(token).is_some() {
                continue;
            }
            let Some(&base) = self.valences.get(token.as_str()) else {
                continue;
            };

            let mut valence = base;
            for back in 1..=LOOKBACK.min(i) {
                let prev = &tokens[i - back];
                if let Some(boost) = booster(prev) {
                    let scaled = boost * BOOSTER_DISTANCE_SCALE[back - 1];
                    valence += if valence > 0.0 { scaled } else { -scaled };
                }
                if is_negation(prev) {
                    valence *= NEGATION_SCALAR;
                }
            }

            match but_at {
                Some(b) if i < b => valence *= BEFORE_BUT_WEIGHT,
                Some(b) if i > b => valence *= AFTER_BUT_WEIGHT,
                _ => {}
            }
            sum += valence;
        }

        if sum == 0.0 {
            return 0.0;
        }

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        let emphasis = exclamations * EXCLAMATION_BOOST;
        sum += if sum > 0.0 { emphasis } else { -emphasis };

        let compound = (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0);
        (compound * 10_000.0).round() / 10_000.0
    }
}

#[async_trait]
impl SentimentScorer for LexiconScorer {
    fn id(&self) -> &str {
        "lexicon"
    }

    async fn score(&self, text: &str) -> Result<f64, ScorerError> {
        Ok(self.polarity(text))
    }
}

/// Lowercase and strip surrounding punctuation; apostrophes are dropped so
/// "don't" and "dont" match the same negation.
fn normalize_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
        .chars()
        .filter(|c| *c != '\'' && *c != '’')
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token)
}

fn booster(token: &str) -> Option<f64> {
    BOOSTERS.iter().find(|(w, _)| *w == token).map(|(_, b)| *b)
}
