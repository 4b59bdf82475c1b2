//! Shared data types for the sentiment pipeline

use crate::sentiment::SentimentScore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A press-conference transcript supplied by the ingestion collaborator.
///
/// Immutable once created; `id` is the stable source identifier
/// (e.g. the source video id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub id: String,
    pub team: String,
    pub coach_name: String,
    pub published_at: DateTime<Utc>,
    pub text: String,
}

impl Transcript {
    /// Calendar date of the press conference
    pub fn date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// One occurrence of a player's name within a transcript.
///
/// Derived transiently by the mention extractor, never persisted on
/// its own. `position` is the byte offset of the match in the
/// transcript text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub transcript_id: String,
    pub player_name: String,
    pub team: String,
    pub context: String,
    pub position: usize,
}

/// A scored player mention, append-only.
///
/// Keyed by `(transcript_id, player_name, position)` so re-analysis of
/// the same transcript is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub transcript_id: String,
    pub player_name: String,
    pub team: String,
    pub coach_name: String,
    pub date: NaiveDate,
    pub score: SentimentScore,
    pub context: String,
    pub position: usize,
    /// Lexicon terms (or model indicators) that drove the score
    pub matched_terms: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

/// Filter for querying persisted sentiment records.
///
/// All fields optional; results are always ordered by date ascending.
#[derive(Debug, Clone, Default)]
pub struct SentimentQuery {
    pub player_name: Option<String>,
    pub team: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl SentimentQuery {
    pub fn for_player(player_name: impl Into<String>) -> Self {
        Self {
            player_name: Some(player_name.into()),
            ..Self::default()
        }
    }

    pub fn for_team(team: impl Into<String>) -> Self {
        Self {
            team: Some(team.into()),
            ..Self::default()
        }
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }
}
