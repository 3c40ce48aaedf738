//! Pipeline configuration
//!
//! Loaded from YAML. Every field has a default, so an empty file (or no
//! file at all) is a valid configuration. Command-line flags override
//! whatever the file says.
//!
//! ```yaml
//! concurrency: 8
//! error_policy: skip_invalid
//! scorer:
//!   timeout_ms: 2000
//!   max_retries: 2
//!   lexicon: /usr/share/review-sentiment/vader_lexicon.txt
//! source:
//!   kind: sqlite
//!   path: /var/lib/marketing/reviews.db
//! output: fact_customer_reviews_with_sentiment.csv
//! ```

use crate::pipeline::{BatchOrchestrator, ErrorPolicy, RecordEnricher};
use crate::scorer::{ScoreAdapter, SentimentScorer};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Scorer host-integration settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScorerConfig {
    /// Per-call timeout in milliseconds; unset means no timeout
    pub timeout_ms: Option<u64>,
    /// Extra attempts after a transient scorer failure
    pub max_retries: u32,
    /// Tab-separated lexicon file; unset means the built-in word list
    pub lexicon: Option<PathBuf>,
}

impl ScorerConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Where reviews come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum SourceConfig {
    Sqlite {
        path: PathBuf,
        #[serde(default)]
        query: Option<String>,
    },
    Csv {
        path: PathBuf,
    },
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Maximum in-flight enrichments; unset means available parallelism
    pub concurrency: Option<usize>,
    pub error_policy: ErrorPolicy,
    pub scorer: ScorerConfig,
    pub source: Option<SourceConfig>,
    /// Output CSV path; unset means stdout
    pub output: Option<PathBuf>,
}

impl PipelineConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null, not as an empty map.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Default config location (~/.config/review-sentiment/config.yaml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("review-sentiment").join("config.yaml"))
    }

    /// Load `explicit` if given (it must exist), otherwise the default
    /// location if a file is there, otherwise defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == Some(0) {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.scorer.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid("scorer.timeout_ms must be at least 1".into()));
        }
        if let Some(SourceConfig::Sqlite { query: Some(q), .. }) = &self.source {
            if q.trim().is_empty() {
                return Err(ConfigError::Invalid("source.query must not be empty".into()));
            }
        }
        Ok(())
    }

    /// Wrap `scorer` with this configuration's timeout and retry policy.
    pub fn score_adapter(&self, scorer: Arc<dyn SentimentScorer>) -> ScoreAdapter {
        let adapter = ScoreAdapter::new(scorer).with_max_retries(self.scorer.max_retries);
        match self.scorer.timeout() {
            Some(timeout) => adapter.with_timeout(timeout),
            None => adapter,
        }
    }

    /// Build an orchestrator around `scorer` with this configuration.
    pub fn orchestrator(&self, scorer: Arc<dyn SentimentScorer>) -> BatchOrchestrator {
        let orchestrator = BatchOrchestrator::new(RecordEnricher::new(self.score_adapter(scorer)))
            .with_error_policy(self.error_policy);
        match self.concurrency {
            Some(limit) => orchestrator.with_concurrency(limit),
            None => orchestrator,
        }
    }
}
