//! Flat JSON-file backend.
//!
//! Progression lives in one shared document (`user_progress.json`) that is
//! overwritten in full on every save: no temp file, no rename, no lock. Two
//! processes saving at once lose one of the snapshots. Generated assessments
//! are stored one document per cache key under `assessments/`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use study_core::model::Assessment;

use crate::repository::{
    AssessmentCache, AssessmentKey, ProgressMap, ProgressRepository, StorageError,
};

pub const PROGRESS_FILE_NAME: &str = "user_progress.json";
pub const ASSESSMENT_DIR_NAME: &str = "assessments";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    progress_path: PathBuf,
    assessment_dir: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `data_root`.
    #[must_use]
    pub fn new(data_root: impl AsRef<Path>) -> Self {
        let root = data_root.as_ref();
        Self {
            progress_path: root.join(PROGRESS_FILE_NAME),
            assessment_dir: root.join(ASSESSMENT_DIR_NAME),
        }
    }

    #[must_use]
    pub fn progress_path(&self) -> &Path {
        &self.progress_path
    }

    #[must_use]
    pub fn assessment_path(&self, key: &AssessmentKey) -> PathBuf {
        self.assessment_dir.join(key.file_name())
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn write_document(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[async_trait]
impl ProgressRepository for JsonFileStore {
    async fn load(&self) -> Result<ProgressMap, StorageError> {
        let Some(bytes) = read_optional(&self.progress_path).await? else {
            debug!(
                "no progress file at {}, starting empty",
                self.progress_path.display()
            );
            return Ok(ProgressMap::new());
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(progress)?;
        write_document(&self.progress_path, &bytes).await
    }
}

#[async_trait]
impl AssessmentCache for JsonFileStore {
    async fn get_assessment(
        &self,
        key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError> {
        let path = self.assessment_path(key);
        match read_optional(&path).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn put_assessment(
        &self,
        key: &AssessmentKey,
        assessment: &Assessment,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(assessment)?;
        write_document(&self.assessment_path(key), &bytes).await
    }
}
