//! Database connection and schema management

use coachpulse_core::StoreError;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (or create) the sentiment database at the given path
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(db_path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let connection_string = format!("sqlite:{}?mode=rwc", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let db = Self { pool };
        db.initialize_schema().await?;

        info!(db_path = %db_path, "Sentiment database initialized");
        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let db = Self { pool };
        db.initialize_schema().await?;
        Ok(db)
    }

    /// Get the connection pool
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn initialize_schema(&self) -> Result<(), StoreError> {
        // One row per scored mention; the natural key makes re-analysis
        // idempotent.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sentiment_records (
                transcript_id TEXT NOT NULL,
                player_name TEXT NOT NULL,
                position INTEGER NOT NULL,
                team TEXT NOT NULL,
                coach_name TEXT NOT NULL,
                date TEXT NOT NULL,
                score REAL NOT NULL,
                context TEXT NOT NULL,
                matched_terms TEXT NOT NULL,
                analyzed_at TEXT NOT NULL,
                PRIMARY KEY (transcript_id, player_name, position)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryError(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_player_date ON sentiment_records(player_name, date)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryError(e.to_string()))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_team_date ON sentiment_records(team, date)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryError(e.to_string()))?;

        Ok(())
    }
}
