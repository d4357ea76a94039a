//! `SQLite` backend.
//!
//! Two tables hold the same documents the JSON backend writes:
//! `learner_progress` keeps one serialized record per session and
//! `assessments` keeps one generated quiz per (session, chapter, level).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{AssessmentCache, ProgressRepository, Storage};

mod assessment_repo;
mod mapping;
mod migrate;
mod progress_repo;

const MAX_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open a pool on `database_url`, creating the database file if needed.
    ///
    /// Connections run in WAL mode and wait up to five seconds on a locked
    /// database, so a CLI call racing another process blocks instead of
    /// failing outright.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is invalid or the database cannot
    /// be opened.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Create the progression and assessment tables if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(&self.pool).await
    }
}

impl Storage {
    /// Progression and assessment cache both backed by one `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the database cannot be opened or
    /// migrated.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let assessments: Arc<dyn AssessmentCache> = Arc::new(repo);
        Ok(Self {
            progress,
            assessments,
        })
    }
}
