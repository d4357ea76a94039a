use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};
use study_core::model::{Assessment, LearnerProgress, Level, SessionId};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialization(e.to_string())
    }
}

/// Every session's progression, ordered by session id.
pub type ProgressMap = BTreeMap<SessionId, LearnerProgress>;

/// Cache slot for one generated assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssessmentKey {
    pub session: SessionId,
    pub chapter_index: u32,
    pub level: Level,
}

impl AssessmentKey {
    #[must_use]
    pub fn new(session: SessionId, chapter_index: u32, level: Level) -> Self {
        Self {
            session,
            chapter_index,
            level,
        }
    }

    /// File name used by the JSON backend.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "{}_ch{}_lvl{}.json",
            self.session, self.chapter_index, self.level
        )
    }
}

impl fmt::Display for AssessmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/chapter {}/level {}",
            self.session, self.chapter_index, self.level
        )
    }
}

/// Repository contract for learner progression.
///
/// The contract is snapshot based: callers load the whole mapping, modify
/// it and save it back. Concurrent writers are not coordinated, so the last
/// snapshot saved wins.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load every session's progression.
    ///
    /// A store that has never been written yields an empty map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read or decoded.
    async fn load(&self) -> Result<ProgressMap, StorageError>;

    /// Persist every session's progression.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the mapping cannot be stored.
    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError>;
}

/// Repository contract for generated assessments.
///
/// Entries are never invalidated by the application; regenerating requires
/// removing the cached entry out of band.
#[async_trait]
pub trait AssessmentCache: Send + Sync {
    /// Fetch a cached assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry exists but cannot be read.
    async fn get_assessment(
        &self,
        key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError>;

    /// Store or replace an assessment.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put_assessment(
        &self,
        key: &AssessmentKey,
        assessment: &Assessment,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<ProgressMap>>,
    assessments: Arc<Mutex<HashMap<AssessmentKey, Assessment>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load(&self) -> Result<ProgressMap, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.clone_from(progress);
        Ok(())
    }
}

#[async_trait]
impl AssessmentCache for InMemoryRepository {
    async fn get_assessment(
        &self,
        key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError> {
        let guard = self
            .assessments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put_assessment(
        &self,
        key: &AssessmentKey,
        assessment: &Assessment,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .assessments
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.clone(), assessment.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub assessments: Arc<dyn AssessmentCache>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let assessments: Arc<dyn AssessmentCache> = Arc::new(repo);
        Self {
            progress,
            assessments,
        }
    }

    /// Build a `Storage` backed by flat JSON documents under `data_root`.
    #[must_use]
    pub fn json_file(data_root: impl AsRef<std::path::Path>) -> Self {
        let store = crate::json_file::JsonFileStore::new(data_root);
        let progress: Arc<dyn ProgressRepository> = Arc::new(store.clone());
        let assessments: Arc<dyn AssessmentCache> = Arc::new(store);
        Self {
            progress,
            assessments,
        }
    }
}
