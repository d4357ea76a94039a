use chrono::Utc;
use sqlx::Row;
use study_core::model::Assessment;

use super::SqliteRepository;
use super::mapping::{conn, level_to_i64, ser};
use crate::repository::{AssessmentCache, AssessmentKey, StorageError};

#[async_trait::async_trait]
impl AssessmentCache for SqliteRepository {
    async fn get_assessment(
        &self,
        key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT record FROM assessments
            WHERE session_id = ?1 AND chapter_index = ?2 AND level = ?3
            ",
        )
        .bind(key.session.as_str())
        .bind(i64::from(key.chapter_index))
        .bind(level_to_i64(key.level))
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record: String = row.try_get("record").map_err(ser)?;
        Ok(Some(serde_json::from_str(&record)?))
    }

    async fn put_assessment(
        &self,
        key: &AssessmentKey,
        assessment: &Assessment,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(assessment)?;
        sqlx::query(
            r"
            INSERT INTO assessments (session_id, chapter_index, level, record, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(session_id, chapter_index, level) DO UPDATE SET
                record = excluded.record,
                created_at = excluded.created_at
            ",
        )
        .bind(key.session.as_str())
        .bind(i64::from(key.chapter_index))
        .bind(level_to_i64(key.level))
        .bind(json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
