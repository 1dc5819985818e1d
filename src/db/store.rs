// ============================================================================
// MESSAGE STORE - idempotent persistence over SQLite
// ============================================================================

use shared::{config::DatabaseConfig, AppError};
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::db::{pool::create_pool, query, stats};
use crate::db::query::MessageQuery;
use crate::models::{InsertOutcome, MessagesPage, StatsReport, StoredMessage, ValidatedMessage};
use crate::observability::record_db_query;
use crate::utils::now_timestamp;

const TABLE: &str = "messages";

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        message_id  TEXT PRIMARY KEY,
        from_msisdn TEXT NOT NULL,
        to_msisdn   TEXT NOT NULL,
        ts          TEXT NOT NULL,
        text        TEXT,
        created_at  TEXT NOT NULL
    );"#,
    "CREATE INDEX IF NOT EXISTS idx_messages_ts_id ON messages (ts, message_id);",
    "CREATE INDEX IF NOT EXISTS idx_messages_from ON messages (from_msisdn);",
];

/// Handle over the `messages` table. Cheap to clone; every clone shares one pool.
///
/// The store is the only writer. Uniqueness of `message_id` is enforced by the
/// primary key, so concurrent inserts of the same id resolve inside SQLite's
/// write lock to exactly one `Created`.
#[derive(Clone, Debug)]
pub struct MessageStore {
    pool: SqlitePool,
}

impl MessageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = create_pool(config).await?;
        Ok(Self::new(pool))
    }

    /// Create-if-absent. Safe to call repeatedly and while serving traffic.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await.map_err(|e| {
                error!("Error applying schema statement: {}", e);
                storage_error(e)
            })?;
        }
        info!("🗄️ Schema for `{}` is in place", TABLE);
        Ok(())
    }

    /// First-write-wins insert. A second insert with the same `message_id`
    /// returns `Duplicate` and leaves the stored row untouched.
    pub async fn insert(&self, message: &ValidatedMessage) -> Result<InsertOutcome, AppError> {
        let started = Instant::now();
        let recorded_at = now_timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO messages (message_id, from_msisdn, to_msisdn, ts, text, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(message_id) DO NOTHING
            "#,
        )
        .bind(message.message_id())
        .bind(message.from_msisdn())
        .bind(message.to_msisdn())
        .bind(message.ts())
        .bind(message.text())
        .bind(&recorded_at)
        .execute(&self.pool)
        .await;

        record_db_query("insert", TABLE, started.elapsed().as_secs_f64(), result.is_ok());

        let done = result.map_err(|e| {
            error!(message_id = %message.message_id(), "Error inserting message: {}", e);
            storage_error(e)
        })?;

        let outcome = if done.rows_affected() == 1 {
            InsertOutcome::Created
        } else {
            InsertOutcome::Duplicate
        };
        debug!(message_id = %message.message_id(), outcome = outcome.as_str(), "insert finished");
        Ok(outcome)
    }

    pub async fn get(&self, message_id: &str) -> Result<Option<StoredMessage>, AppError> {
        let started = Instant::now();
        let result = sqlx::query_as::<_, StoredMessage>(
            "SELECT message_id, from_msisdn, to_msisdn, ts, text, created_at FROM messages WHERE message_id = ?",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await;

        record_db_query("select", TABLE, started.elapsed().as_secs_f64(), result.is_ok());
        result.map_err(storage_error)
    }

    pub async fn query(&self, params: &MessageQuery) -> Result<MessagesPage, AppError> {
        let started = Instant::now();
        let result = query::run_query(&self.pool, params).await;

        record_db_query("query", TABLE, started.elapsed().as_secs_f64(), result.is_ok());
        result.map_err(|e| {
            error!("Error querying messages: {}", e);
            storage_error(e)
        })
    }

    pub async fn stats(&self) -> Result<StatsReport, AppError> {
        let started = Instant::now();
        let result = stats::collect_stats(&self.pool).await;

        record_db_query("stats", TABLE, started.elapsed().as_secs_f64(), result.is_ok());
        result.map_err(|e| {
            error!("Error collecting stats: {}", e);
            storage_error(e)
        })
    }

    /// True only when the database answers and the `messages` table exists.
    pub async fn is_ready(&self) -> bool {
        let result = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(TABLE)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(found) => found.is_some(),
            Err(e) => {
                error!("Readiness check against sqlite failed: {}", e);
                false
            }
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Connectivity problems and a missing schema are reported as storage unavailability.
fn storage_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            AppError::storage_unavailable(err.to_string())
        }
        sqlx::Error::Database(ref db) if db.message().contains("no such table") => {
            AppError::storage_unavailable(err.to_string())
        }
        other => AppError::Database(other),
    }
}
