//! Application configuration
//!
//! Loaded from a TOML file; every section falls back to defaults so a
//! bare config (or none at all) yields a working lexicon-only setup.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub trends: TrendConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|_| ConfigError::FileNotFound(path.as_ref().display().to_string()))?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Sentiment database location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/sentiment.db".to_string(),
        }
    }
}

/// Roster snapshot location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub path: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: "config/roster.json".to_string(),
        }
    }
}

/// Which scorer variant to use, selected by configuration rather than
/// runtime type inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Lexicon,
    Model,
}

/// Mention extraction and batch analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Scorer variant; lexicon is the zero-dependency default
    pub scorer: ScorerKind,
    /// Words captured on each side of a mention
    pub context_window_words: usize,
    /// Bounded number of transcripts analyzed concurrently
    pub max_concurrent_transcripts: usize,
    /// Optional lexicon override file (JSON map of term -> weight)
    pub lexicon_path: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scorer: ScorerKind::Lexicon,
            context_window_words: 40,
            max_concurrent_transcripts: 4,
            lexicon_path: None,
        }
    }
}

/// External sentiment model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub endpoint: String,
    /// Environment variable holding the API key, if the service needs one
    pub api_key_env: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8080/v1/score".to_string(),
            api_key_env: None,
            model: "sentiment-small".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Trend classification windows and thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Days in the "recent" bucket
    pub recent_window_days: i64,
    /// Days in the "prior" bucket, immediately before the recent bucket
    pub prior_window_days: i64,
    /// Minimum recent-vs-prior delta to classify a shift
    pub shift_threshold: f64,
    /// Players with fewer samples are suppressed from team reports
    pub min_samples: usize,
    /// Watch-list admission: recent average at or below this value
    pub watch_list_cutoff: f64,
    /// List length for favorites and watch list
    pub top_n: usize,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            recent_window_days: 14,
            prior_window_days: 14,
            shift_threshold: 0.2,
            min_samples: 3,
            watch_list_cutoff: -0.3,
            top_n: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_lexicon_only() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.scorer, ScorerKind::Lexicon);
        assert_eq!(config.analysis.context_window_words, 40);
        assert_eq!(config.trends.recent_window_days, 14);
        assert_eq!(config.trends.shift_threshold, 0.2);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [analysis]
            scorer = "model"
            context_window_words = 25
            max_concurrent_transcripts = 8
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.scorer, ScorerKind::Model);
        assert_eq!(config.analysis.context_window_words, 25);
        assert_eq!(config.database.path, "data/sentiment.db");
        assert_eq!(config.trends.min_samples, 3);
    }
}
