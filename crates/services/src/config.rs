use std::env;
use std::path::PathBuf;

use study_core::progression::DEFAULT_COOLDOWN_SECS;

use crate::documents::{DEFAULT_CONTEXT_LIMIT, DEFAULT_DOCUMENT_EXTENSIONS};

/// Where progression and cached assessments are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Flat JSON documents under the data root.
    Json,
    /// `SQLite` database at the given URL.
    Sqlite(String),
}

impl StoreBackend {
    /// Parse `json` or a `sqlite:` URL.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if raw.starts_with("sqlite:") {
            Some(Self::Sqlite(raw.to_string()))
        } else {
            None
        }
    }
}

/// Runtime settings for the study services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyConfig {
    pub upload_root: PathBuf,
    pub data_root: PathBuf,
    pub store: StoreBackend,
    pub cooldown_secs: i64,
    pub context_limit: usize,
    pub document_extensions: Vec<String>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            upload_root: PathBuf::from("uploads"),
            data_root: PathBuf::from("data"),
            store: StoreBackend::Json,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            context_limit: DEFAULT_CONTEXT_LIMIT,
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }
}

impl StudyConfig {
    /// Defaults overridden by `STUDY_*` environment variables.
    ///
    /// Unparseable values are ignored in favour of the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = env::var("STUDY_UPLOAD_ROOT") {
            config.upload_root = PathBuf::from(root);
        }
        if let Ok(root) = env::var("STUDY_DATA_ROOT") {
            config.data_root = PathBuf::from(root);
        }
        if let Some(store) = env::var("STUDY_STORE")
            .ok()
            .and_then(|raw| StoreBackend::parse(&raw))
        {
            config.store = store;
        }
        if let Some(secs) = env::var("STUDY_COOLDOWN_SECS")
            .ok()
            .and_then(|raw| raw.parse::<i64>().ok())
            .filter(|secs| *secs >= 0)
        {
            config.cooldown_secs = secs;
        }
        if let Some(limit) = env::var("STUDY_CONTEXT_LIMIT")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
        {
            config.context_limit = limit;
        }
        config
    }
}
