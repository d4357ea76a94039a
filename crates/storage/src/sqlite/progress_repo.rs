use chrono::Utc;
use sqlx::Row;
use study_core::model::LearnerProgress;

use super::SqliteRepository;
use super::mapping::{conn, ser, session_id_from_str};
use crate::repository::{ProgressMap, ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load(&self) -> Result<ProgressMap, StorageError> {
        let rows = sqlx::query("SELECT session_id, record FROM learner_progress")
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut map = ProgressMap::new();
        for row in rows {
            let session: String = row.try_get("session_id").map_err(ser)?;
            let record: String = row.try_get("record").map_err(ser)?;
            let progress: LearnerProgress = serde_json::from_str(&record)?;
            map.insert(session_id_from_str(&session)?, progress);
        }
        Ok(map)
    }

    /// Upserts every session in one transaction.
    ///
    /// Sessions absent from `progress` are left in place; nothing in the
    /// application removes a session.
    async fn save(&self, progress: &ProgressMap) -> Result<(), StorageError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (session, record) in progress {
            let json = serde_json::to_string(record)?;
            sqlx::query(
                r"
                INSERT INTO learner_progress (session_id, record, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(session_id) DO UPDATE SET
                    record = excluded.record,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(session.as_str())
            .bind(json)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }
}
