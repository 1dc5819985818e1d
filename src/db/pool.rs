use anyhow::Context;
use shared::config::DatabaseConfig;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Where the SQLite database lives, as derived from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseUrlError {
    #[error("DATABASE_URL must be a sqlite URL")]
    NotSqlite,

    #[error("DATABASE_URL does not name a database file")]
    MissingPath,
}

/// Accepted forms:
/// - `sqlite:////data/app.db` and `sqlite:///data/app.db` -> `/data/app.db`
/// - `sqlite://data/app.db` and `sqlite:data/app.db` -> `data/app.db` (relative)
/// - `sqlite::memory:`
///
/// A trailing `?query` is ignored.
pub fn parse_database_url(url: &str) -> Result<SqliteLocation, DatabaseUrlError> {
    let rest = url
        .trim()
        .strip_prefix("sqlite:")
        .ok_or(DatabaseUrlError::NotSqlite)?;
    let rest = rest.split('?').next().unwrap_or_default();

    if rest == ":memory:" || rest == "//:memory:" {
        return Ok(SqliteLocation::Memory);
    }

    let path = if rest.starts_with("////") {
        &rest[3..]
    } else if rest.starts_with("//") {
        &rest[2..]
    } else {
        rest
    };

    if path.is_empty() || path == "/" {
        return Err(DatabaseUrlError::MissingPath);
    }
    Ok(SqliteLocation::File(PathBuf::from(path)))
}

// Crea los directorios padre del archivo si no existen
fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent dirs for {:?}", parent))?;
    }
    Ok(())
}

/// Builds the SQLite pool backing the message store.
pub async fn create_pool(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let location = parse_database_url(&config.url).context("parse DATABASE_URL")?;
    let busy_timeout = Duration::from_millis(config.busy_timeout_ms);

    let pool = match &location {
        SqliteLocation::Memory => {
            // Cada conexión en memoria es una base distinta: una sola conexión, siempre viva
            let options = SqliteConnectOptions::new()
                .in_memory(true)
                .busy_timeout(busy_timeout);
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await
                .context("open in-memory sqlite database")?
        }
        SqliteLocation::File(path) => {
            ensure_parent_dir(path)?;
            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .busy_timeout(busy_timeout);
            SqlitePoolOptions::new()
                .max_connections(config.max_connections.max(1))
                .acquire_timeout(Duration::from_secs(5))
                .connect_with(options)
                .await
                .with_context(|| format!("connect to sqlite file {:?}", path))?
        }
    };

    info!(
        location = ?location,
        max_connections = config.max_connections,
        "✅ SQLite pool created"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths() {
        assert_eq!(
            parse_database_url("sqlite:////data/app.db"),
            Ok(SqliteLocation::File(PathBuf::from("/data/app.db")))
        );
        assert_eq!(
            parse_database_url("sqlite:///data/app.db"),
            Ok(SqliteLocation::File(PathBuf::from("/data/app.db")))
        );
    }

    #[test]
    fn relative_paths() {
        assert_eq!(
            parse_database_url("sqlite://inbox.db"),
            Ok(SqliteLocation::File(PathBuf::from("inbox.db")))
        );
        assert_eq!(
            parse_database_url("sqlite:var/inbox.db?mode=rwc"),
            Ok(SqliteLocation::File(PathBuf::from("var/inbox.db")))
        );
    }

    #[test]
    fn memory_database() {
        assert_eq!(parse_database_url("sqlite::memory:"), Ok(SqliteLocation::Memory));
    }

    #[test]
    fn rejects_non_sqlite_urls() {
        assert_eq!(
            parse_database_url("postgresql://localhost:5432/db"),
            Err(DatabaseUrlError::NotSqlite)
        );
        assert_eq!(parse_database_url("sqlite:"), Err(DatabaseUrlError::MissingPath));
        assert_eq!(parse_database_url("sqlite:///"), Err(DatabaseUrlError::MissingPath));
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let nested = dir.path().join("a").join("b").join("inbox.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", nested.display()),
            ..DatabaseConfig::default()
        };

        let pool = create_pool(&config).await?;
        sqlx::query("SELECT 1").execute(&pool).await?;

        assert!(nested.exists(), "db file should have been created");
        Ok(())
    }
}
