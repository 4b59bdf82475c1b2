//! Trend aggregator
//!
//! Pure function of the current record set: nothing here is persisted,
//! and every result is current as of the `now` passed in. The
//! recent-vs-prior partition is boundary-sensitive by design, so
//! re-running at a different `now` can reclassify records near the
//! bucket edge.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use coachpulse_core::{RosterIndex, SentimentQuery, SentimentStore, StoreError, TrendConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Directional classification of recent vs prior average sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

/// Per-player trend, derived on demand and never stored
#[derive(Debug, Clone, Serialize)]
pub struct TrendResult {
    pub player_name: String,
    /// Mean over every record in both windows
    pub avg_sentiment: f64,
    /// Mean over the recent window; `None` when the bucket is empty
    pub recent_avg: Option<f64>,
    /// Mean over the prior window; `None` when the bucket is empty
    pub prior_avg: Option<f64>,
    pub trend: TrendDirection,
    /// Set when either bucket had zero samples; the trend is then
    /// forced to `Stable`
    pub insufficient_data: bool,
    pub sample_count: usize,
}

/// Team-level summary: favorites and watch list
#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: String,
    pub roster_version: String,
    pub generated_at: DateTime<Utc>,
    /// Every rostered player with at least one record in the windows
    pub players: Vec<TrendResult>,
    /// Top players by recent average, positive only
    pub favorites: Vec<TrendResult>,
    /// Bottom players by recent average, at or below the cutoff
    pub watch_list: Vec<TrendResult>,
}

/// A notable sentiment shift for one player
#[derive(Debug, Clone, Serialize)]
pub struct ShiftReport {
    pub player_name: String,
    pub trend: TrendDirection,
    pub magnitude: f64,
    pub recent_avg: f64,
    pub prior_avg: f64,
    pub sample_count: usize,
}

/// Computes trends and team reports from the sentiment store
pub struct TrendAggregator {
    store: Arc<dyn SentimentStore>,
    config: TrendConfig,
}

impl TrendAggregator {
    pub fn new(store: Arc<dyn SentimentStore>, config: TrendConfig) -> Self {
        Self { store, config }
    }

    /// Classify one player's trend as of `now`.
    ///
    /// Recent bucket: `(now - recent_window, now]`. Prior bucket: the
    /// `prior_window` days immediately before that. An empty bucket
    /// yields `Stable` with `insufficient_data` set.
    pub async fn compute_trend(
        &self,
        player_name: &str,
        now: DateTime<Utc>,
    ) -> Result<TrendResult, StoreError> {
        let now_date = now.date_naive();
        let recent_cutoff = now_date - Duration::days(self.config.recent_window_days);
        let earliest = recent_cutoff - Duration::days(self.config.prior_window_days);

        let records = self
            .store
            .query(
                &SentimentQuery::for_player(player_name)
                    .from_date(earliest + Duration::days(1))
                    .to_date(now_date),
            )
            .await?;

        let (recent, prior): (Vec<_>, Vec<_>) =
            records.iter().partition(|r| r.date > recent_cutoff);

        let recent_avg = mean(recent.iter().map(|r| r.score.value()));
        let prior_avg = mean(prior.iter().map(|r| r.score.value()));
        let avg_sentiment = mean(records.iter().map(|r| r.score.value())).unwrap_or(0.0);

        let (trend, insufficient_data) = match (recent_avg, prior_avg) {
            (Some(recent), Some(prior)) => {
                let delta = recent - prior;
                let trend = if delta > self.config.shift_threshold {
                    TrendDirection::Improving
                } else if delta < -self.config.shift_threshold {
                    TrendDirection::Declining
                } else {
                    TrendDirection::Stable
                };
                (trend, false)
            }
            _ => (TrendDirection::Stable, true),
        };

        debug!(
            player = %player_name,
            sample_count = records.len(),
            ?recent_avg,
            ?prior_avg,
            "Computed trend"
        );

        Ok(TrendResult {
            player_name: player_name.to_string(),
            avg_sentiment,
            recent_avg,
            prior_avg,
            trend,
            insufficient_data,
            sample_count: records.len(),
        })
    }

    /// Trend report for every player on the team's active roster.
    ///
    /// Players below the minimum sample count are suppressed from both
    /// the favorites and the watch list so single mentions never make
    /// a list.
    pub async fn team_report(
        &self,
        team: &str,
        roster: &RosterIndex,
        now: DateTime<Utc>,
    ) -> Result<TeamReport, StoreError> {
        let mut players = Vec::new();
        for player in roster.players_for_team(team) {
            let result = self.compute_trend(&player.full_name, now).await?;
            if result.sample_count > 0 {
                players.push(result);
            }
        }
        players.sort_by(|a, b| {
            cmp_f64_desc(
                a.recent_avg.unwrap_or(f64::NEG_INFINITY),
                b.recent_avg.unwrap_or(f64::NEG_INFINITY),
            )
            .then_with(|| a.player_name.cmp(&b.player_name))
        });

        let eligible: Vec<&TrendResult> = players
            .iter()
            .filter(|r| r.sample_count >= self.config.min_samples)
            .collect();

        let favorites: Vec<TrendResult> = eligible
            .iter()
            .filter(|r| r.recent_avg.is_some_and(|avg| avg > 0.0))
            .take(self.config.top_n)
            .map(|r| (*r).clone())
            .collect();

        let mut watch_list: Vec<TrendResult> = eligible
            .iter()
            .filter(|r| {
                r.recent_avg
                    .is_some_and(|avg| avg <= self.config.watch_list_cutoff)
            })
            .map(|r| (*r).clone())
            .collect();
        watch_list.sort_by(|a, b| {
            cmp_f64_desc(
                b.recent_avg.unwrap_or(f64::INFINITY),
                a.recent_avg.unwrap_or(f64::INFINITY),
            )
        });
        watch_list.truncate(self.config.top_n);

        Ok(TeamReport {
            team: team.to_string(),
            roster_version: roster.version().to_string(),
            generated_at: now,
            players,
            favorites,
            watch_list,
        })
    }

    /// Team reports for every team in the active roster, ordered by
    /// team name.
    pub async fn league_report(
        &self,
        roster: &RosterIndex,
        now: DateTime<Utc>,
    ) -> Result<Vec<TeamReport>, StoreError> {
        let mut reports = Vec::new();
        for team in roster.teams() {
            reports.push(self.team_report(&team, roster, now).await?);
        }
        Ok(reports)
    }

    /// Every stored player whose recent-vs-prior delta is at least
    /// `min_shift`, sorted by magnitude descending.
    pub async fn notable_shifts(
        &self,
        now: DateTime<Utc>,
        min_shift: f64,
    ) -> Result<Vec<ShiftReport>, StoreError> {
        let mut shifts = Vec::new();
        for player in self.store.distinct_players().await? {
            let result = self.compute_trend(&player, now).await?;
            let (Some(recent), Some(prior)) = (result.recent_avg, result.prior_avg) else {
                continue;
            };
            let magnitude = (recent - prior).abs();
            if magnitude >= min_shift {
                shifts.push(ShiftReport {
                    player_name: result.player_name,
                    trend: result.trend,
                    magnitude,
                    recent_avg: recent,
                    prior_avg: prior,
                    sample_count: result.sample_count,
                });
            }
        }
        shifts.sort_by(|a, b| cmp_f64_desc(a.magnitude, b.magnitude));
        Ok(shifts)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn cmp_f64_desc(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}
