use study_core::model::{Level, SessionId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn session_id_from_str(raw: &str) -> Result<SessionId, StorageError> {
    SessionId::new(raw).map_err(ser)
}

pub(crate) fn level_to_i64(level: Level) -> i64 {
    i64::from(level.as_u8())
}
