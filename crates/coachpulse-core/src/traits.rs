use crate::error::{ScorerError, StoreError};
use crate::sentiment::SentimentScore;
use crate::types::{SentimentQuery, SentimentRecord};
use async_trait::async_trait;

/// A sentiment scorer variant.
///
/// Two implementations exist: the deterministic lexicon scorer (no I/O)
/// and the external-model scorer (network, with timeout and lexicon
/// fallback). Both score an empty context as exactly 0.0.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    /// Short identifier for logging
    fn name(&self) -> &str;

    /// Score the coach's sentiment toward `player_name` within
    /// `context`, bounded to [-1.0, 1.0].
    async fn score(
        &self,
        context: &str,
        player_name: &str,
    ) -> Result<ScoredMention, ScorerError>;
}

/// Scorer output: the bounded score plus the terms that drove it
#[derive(Debug, Clone, Default)]
pub struct ScoredMention {
    pub score: SentimentScore,
    pub matched_terms: Vec<String>,
}

impl ScoredMention {
    pub fn neutral() -> Self {
        Self::default()
    }
}

/// Append-only store of scored mentions.
///
/// `append` is the only mutation; corrections are handled upstream by
/// re-ingestion under distinguishable transcript ids.
#[async_trait]
pub trait SentimentStore: Send + Sync {
    /// Insert a record. Returns `false` when a record with the same
    /// `(transcript_id, player_name, position)` key already exists,
    /// making re-analysis idempotent.
    async fn append(&self, record: &SentimentRecord) -> Result<bool, StoreError>;

    /// Fetch records matching the filter, ordered by date ascending.
    async fn query(&self, query: &SentimentQuery) -> Result<Vec<SentimentRecord>, StoreError>;

    /// Total number of stored records
    async fn count(&self) -> Result<i64, StoreError>;

    /// Every player name with at least one stored record
    async fn distinct_players(&self) -> Result<Vec<String>, StoreError>;
}
