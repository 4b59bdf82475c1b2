//! SQLite sentiment store
//!
//! Append-only repository over `sentiment_records`. Appends are single
//! inserts against the pool, so concurrent pipeline workers are safe
//! without any multi-record transaction.

use crate::database::Database;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use coachpulse_core::{
    SentimentQuery, SentimentRecord, SentimentScore, SentimentStore, StoreError,
};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

/// `SentimentStore` backed by SQLite
pub struct SqliteSentimentStore {
    db: Database,
}

impl SqliteSentimentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn row_to_record(row: &SqliteRow) -> Result<SentimentRecord, StoreError> {
        let date: String = row.get("date");
        let analyzed_at: String = row.get("analyzed_at");
        let matched_terms: String = row.get("matched_terms");
        let position: i64 = row.get("position");

        Ok(SentimentRecord {
            transcript_id: row.get("transcript_id"),
            player_name: row.get("player_name"),
            team: row.get("team"),
            coach_name: row.get("coach_name"),
            date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
                .map_err(|e| StoreError::SerializationError(e.to_string()))?,
            score: SentimentScore::new(row.get::<f64, _>("score")),
            context: row.get("context"),
            position: position as usize,
            matched_terms: serde_json::from_str(&matched_terms)
                .map_err(|e| StoreError::SerializationError(e.to_string()))?,
            analyzed_at: DateTime::parse_from_rfc3339(&analyzed_at)
                .map_err(|e| StoreError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl SentimentStore for SqliteSentimentStore {
    async fn append(&self, record: &SentimentRecord) -> Result<bool, StoreError> {
        let matched_terms = serde_json::to_string(&record.matched_terms)
            .map_err(|e| StoreError::SerializationError(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO sentiment_records (
                transcript_id, player_name, position, team, coach_name,
                date, score, context, matched_terms, analyzed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.transcript_id)
        .bind(&record.player_name)
        .bind(record.position as i64)
        .bind(&record.team)
        .bind(&record.coach_name)
        .bind(record.date.format("%Y-%m-%d").to_string())
        .bind(record.score.value())
        .bind(&record.context)
        .bind(matched_terms)
        .bind(record.analyzed_at.to_rfc3339())
        .execute(self.db.pool())
        .await
        .map_err(|e| StoreError::QueryError(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn query(&self, query: &SentimentQuery) -> Result<Vec<SentimentRecord>, StoreError> {
        let mut sql = String::from("SELECT * FROM sentiment_records WHERE 1=1");
        if query.player_name.is_some() {
            sql.push_str(" AND player_name = ?");
        }
        if query.team.is_some() {
            sql.push_str(" AND team = ?");
        }
        if query.date_from.is_some() {
            sql.push_str(" AND date >= ?");
        }
        if query.date_to.is_some() {
            sql.push_str(" AND date <= ?");
        }
        sql.push_str(" ORDER BY date ASC, transcript_id ASC, position ASC");

        let mut q = sqlx::query(&sql);
        if let Some(player) = &query.player_name {
            q = q.bind(player.as_str());
        }
        if let Some(team) = &query.team {
            q = q.bind(team.as_str());
        }
        if let Some(from) = &query.date_from {
            q = q.bind(from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = &query.date_to {
            q = q.bind(to.format("%Y-%m-%d").to_string());
        }

        let rows = q
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM sentiment_records")
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(row.get("count"))
    }

    async fn distinct_players(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT DISTINCT player_name FROM sentiment_records ORDER BY player_name ASC",
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(rows.iter().map(|r| r.get("player_name")).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn setup_store() -> SqliteSentimentStore {
        SqliteSentimentStore::new(Database::in_memory().await.unwrap())
    }

    fn record(
        transcript_id: &str,
        player: &str,
        team: &str,
        date: NaiveDate,
        position: usize,
        score: f64,
    ) -> SentimentRecord {
        SentimentRecord {
            transcript_id: transcript_id.to_string(),
            player_name: player.to_string(),
            team: team.to_string(),
            coach_name: "Coach".to_string(),
            date,
            score: SentimentScore::new(score),
            context: "some context".to_string(),
            position,
            matched_terms: vec!["trust".to_string()],
            analyzed_at: Utc.with_ymd_and_hms(2025, 1, 10, 23, 0, 0).unwrap(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[tokio::test]
    async fn test_append_and_roundtrip() {
        let store = setup_store().await;
        let rec = record("vid-1", "Jayson Tatum", "Celtics", day(10), 14, 0.8);
        assert!(store.append(&rec).await.unwrap());

        let fetched = store
            .query(&SentimentQuery::for_player("Jayson Tatum"))
            .await
            .unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].transcript_id, "vid-1");
        assert_eq!(fetched[0].position, 14);
        assert_eq!(fetched[0].score.value(), 0.8);
        assert_eq!(fetched[0].matched_terms, vec!["trust".to_string()]);
        assert_eq!(fetched[0].date, day(10));
    }

    #[tokio::test]
    async fn test_duplicate_key_is_ignored() {
        let store = setup_store().await;
        let rec = record("vid-1", "Jayson Tatum", "Celtics", day(10), 14, 0.8);
        assert!(store.append(&rec).await.unwrap());
        // Same key, different score: append reports a duplicate and the
        // original row wins
        let again = record("vid-1", "Jayson Tatum", "Celtics", day(10), 14, -0.5);
        assert!(!store.append(&again).await.unwrap());

        let fetched = store.query(&SentimentQuery::default()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].score.value(), 0.8);
    }

    #[tokio::test]
    async fn test_same_transcript_distinct_positions_both_kept() {
        let store = setup_store().await;
        store
            .append(&record("vid-1", "Jayson Tatum", "Celtics", day(10), 14, 0.8))
            .await
            .unwrap();
        store
            .append(&record("vid-1", "Jayson Tatum", "Celtics", day(10), 220, -0.2))
            .await
            .unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_query_ordered_by_date_ascending() {
        let store = setup_store().await;
        for (id, d) in [("vid-3", 20), ("vid-1", 5), ("vid-2", 12)] {
            store
                .append(&record(id, "Jayson Tatum", "Celtics", day(d), 0, 0.1))
                .await
                .unwrap();
        }
        let fetched = store
            .query(&SentimentQuery::for_player("Jayson Tatum"))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = fetched.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(5), day(12), day(20)]);
    }

    #[tokio::test]
    async fn test_date_range_and_team_filters() {
        let store = setup_store().await;
        store
            .append(&record("vid-1", "Jayson Tatum", "Celtics", day(5), 0, 0.1))
            .await
            .unwrap();
        store
            .append(&record("vid-2", "Jayson Tatum", "Celtics", day(15), 0, 0.2))
            .await
            .unwrap();
        store
            .append(&record("vid-3", "Troy Brown", "Lakers", day(15), 0, 0.3))
            .await
            .unwrap();

        let windowed = store
            .query(&SentimentQuery::for_player("Jayson Tatum").from_date(day(10)).to_date(day(20)))
            .await
            .unwrap();
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].transcript_id, "vid-2");

        let lakers = store
            .query(&SentimentQuery::for_team("Lakers"))
            .await
            .unwrap();
        assert_eq!(lakers.len(), 1);
        assert_eq!(lakers[0].player_name, "Troy Brown");
    }

    #[tokio::test]
    async fn test_distinct_players() {
        let store = setup_store().await;
        store
            .append(&record("vid-1", "Jayson Tatum", "Celtics", day(5), 0, 0.1))
            .await
            .unwrap();
        store
            .append(&record("vid-1", "Jaylen Brown", "Celtics", day(5), 40, 0.1))
            .await
            .unwrap();
        store
            .append(&record("vid-2", "Jayson Tatum", "Celtics", day(6), 0, 0.1))
            .await
            .unwrap();
        assert_eq!(
            store.distinct_players().await.unwrap(),
            vec!["Jaylen Brown".to_string(), "Jayson Tatum".to_string()]
        );
    }
}
