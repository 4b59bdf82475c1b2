//! Batch analysis pipeline
//!
//! Wires the roster index, mention extractor, scorer, and store into a
//! per-transcript analysis pass, and runs transcripts concurrently with
//! a bounded worker count. One bad transcript never blocks the rest of
//! a run; a store write failure aborts only that transcript's remaining
//! writes.

use crate::extractor::MentionExtractor;
use chrono::Utc;
use coachpulse_core::{
    AnalysisError, RosterError, RosterIndex, RosterSnapshot, SentimentRecord, SentimentScorer,
    SentimentStore, Transcript,
};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Per-transcript analysis outcome
#[derive(Debug, Clone, Default)]
pub struct TranscriptReport {
    pub transcript_id: String,
    pub mentions_found: usize,
    pub records_appended: usize,
    pub duplicates_skipped: usize,
    pub ambiguous_skipped: usize,
    pub scoring_failures: usize,
}

/// Aggregated outcome of a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub transcripts_processed: usize,
    pub transcripts_failed: usize,
    pub mentions_found: usize,
    pub records_appended: usize,
    pub duplicates_skipped: usize,
    pub ambiguous_skipped: usize,
    pub scoring_failures: usize,
}

impl BatchSummary {
    fn absorb(&mut self, report: &TranscriptReport) {
        self.transcripts_processed += 1;
        self.mentions_found += report.mentions_found;
        self.records_appended += report.records_appended;
        self.duplicates_skipped += report.duplicates_skipped;
        self.ambiguous_skipped += report.ambiguous_skipped;
        self.scoring_failures += report.scoring_failures;
    }
}

/// Analyzes transcripts end to end: extract, score, append
#[derive(Clone)]
pub struct TranscriptAnalyzer {
    roster: Arc<RosterIndex>,
    extractor: MentionExtractor,
    scorer: Arc<dyn SentimentScorer>,
    store: Arc<dyn SentimentStore>,
    max_concurrent: usize,
}

impl TranscriptAnalyzer {
    pub fn new(
        roster: RosterIndex,
        extractor: MentionExtractor,
        scorer: Arc<dyn SentimentScorer>,
        store: Arc<dyn SentimentStore>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            roster: Arc::new(roster),
            extractor,
            scorer,
            store,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Active roster index
    pub fn roster(&self) -> &RosterIndex {
        &self.roster
    }

    /// Swap in a new roster snapshot. Past records are not re-resolved;
    /// only analyses after the swap use the new snapshot.
    pub fn reload_roster(&mut self, snapshot: &RosterSnapshot) -> Result<(), RosterError> {
        let index = RosterIndex::new(snapshot)?;
        info!(version = %index.version(), "Roster snapshot reloaded");
        self.roster = Arc::new(index);
        Ok(())
    }

    /// Analyze one transcript: extract mentions, score each, append
    /// records. Re-running over the same transcript is idempotent.
    pub async fn analyze(&self, transcript: &Transcript) -> Result<TranscriptReport, AnalysisError> {
        let extraction = self.extractor.extract(transcript, &self.roster);

        let mut report = TranscriptReport {
            transcript_id: transcript.id.clone(),
            mentions_found: extraction.mentions.len(),
            ambiguous_skipped: extraction.ambiguous_skipped,
            ..TranscriptReport::default()
        };

        for mention in extraction.mentions {
            let scored = match self
                .scorer
                .score(&mention.context, &mention.player_name)
                .await
            {
                Ok(scored) => scored,
                Err(err) => {
                    warn!(
                        transcript_id = %transcript.id,
                        player = %mention.player_name,
                        error = %err,
                        "Scoring failed for mention"
                    );
                    report.scoring_failures += 1;
                    continue;
                }
            };

            let record = SentimentRecord {
                transcript_id: mention.transcript_id,
                player_name: mention.player_name,
                team: mention.team,
                coach_name: transcript.coach_name.clone(),
                date: transcript.date(),
                score: scored.score,
                context: mention.context,
                position: mention.position,
                matched_terms: scored.matched_terms,
                analyzed_at: Utc::now(),
            };

            // Committed records stay committed; a write failure aborts
            // only this transcript's remaining appends.
            let appended =
                self.store
                    .append(&record)
                    .await
                    .map_err(|source| AnalysisError::StoreWriteFailure {
                        transcript_id: transcript.id.clone(),
                        source,
                    })?;
            if appended {
                report.records_appended += 1;
            } else {
                report.duplicates_skipped += 1;
            }
        }

        info!(
            transcript_id = %transcript.id,
            mentions = report.mentions_found,
            appended = report.records_appended,
            duplicates = report.duplicates_skipped,
            ambiguous = report.ambiguous_skipped,
            "Transcript analyzed"
        );
        Ok(report)
    }

    /// Analyze a batch of transcripts concurrently, bounded by the
    /// configured worker count. Per-transcript failures are logged and
    /// counted, never fatal to the batch.
    pub async fn analyze_batch(&self, transcripts: Vec<Transcript>) -> BatchSummary {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut join_set = JoinSet::new();

        for transcript in transcripts {
            let analyzer = self.clone();
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = analyzer.analyze(&transcript).await;
                (transcript.id, result)
            });
        }

        let mut summary = BatchSummary::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((_, Ok(report))) => summary.absorb(&report),
                Ok((transcript_id, Err(err))) => {
                    error!(transcript_id = %transcript_id, error = %err, "Transcript analysis failed");
                    summary.transcripts_failed += 1;
                }
                Err(join_err) => {
                    error!(error = %join_err, "Analysis task panicked");
                    summary.transcripts_failed += 1;
                }
            }
        }

        info!(
            processed = summary.transcripts_processed,
            failed = summary.transcripts_failed,
            appended = summary.records_appended,
            "Batch analysis complete"
        );
        summary
    }
}
