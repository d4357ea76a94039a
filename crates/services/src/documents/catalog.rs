use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::warn;
use study_core::model::{Chapter, SessionId, order_chapters};

pub const DEFAULT_DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

/// Lists a session's uploaded documents as ordered chapters.
///
/// Uploads live in `<upload_root>/<session>/`. The listing is recomputed on
/// every call, so inserting or deleting an older document shifts the index
/// of every later chapter.
#[derive(Debug, Clone)]
pub struct ChapterCatalog {
    upload_root: PathBuf,
    extensions: Vec<String>,
}

impl ChapterCatalog {
    #[must_use]
    pub fn new(upload_root: impl Into<PathBuf>) -> Self {
        Self {
            upload_root: upload_root.into(),
            extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_string())
                .collect(),
        }
    }

    /// Restrict which file extensions count as chapters (case-insensitive).
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.into().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    #[must_use]
    pub fn session_dir(&self, session: &SessionId) -> PathBuf {
        self.upload_root.join(session.as_str())
    }

    fn is_document(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
    }

    /// Chapters of `session`, oldest upload first.
    ///
    /// A missing session directory is an empty listing. Unreadable entries
    /// are logged and skipped.
    pub async fn list_chapters(&self, session: &SessionId) -> Vec<Chapter> {
        let dir = self.session_dir(session);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("cannot list uploads in {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let mut chapters = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!("error while listing {}: {e}", dir.display());
                    break;
                }
            };
            let path = entry.path();
            if !self.is_document(&path) {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!("skipping {}: {e}", path.display());
                    continue;
                }
            };
            // Not every filesystem records birth time.
            let Ok(created) = metadata.created().or_else(|_| metadata.modified()) else {
                warn!("skipping {}: no timestamp available", path.display());
                continue;
            };
            let name = entry.file_name().to_string_lossy().into_owned();
            chapters.push(Chapter::new(name, path, DateTime::<Utc>::from(created)));
        }

        order_chapters(&mut chapters);
        chapters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_session_dir_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ChapterCatalog::new(dir.path());
        let session = SessionId::new("nobody").unwrap();
        assert!(catalog.list_chapters(&session).await.is_empty());
    }

    #[tokio::test]
    async fn only_document_extensions_are_chapters() {
        let dir = tempfile::tempdir().unwrap();
        let session = SessionId::new("s").unwrap();
        let session_dir = dir.path().join("s");
        std::fs::create_dir_all(session_dir.join("nested.pdf")).unwrap();
        std::fs::write(session_dir.join("ch1.PDF"), b"x").unwrap();
        std::fs::write(session_dir.join("notes.txt"), b"x").unwrap();
        std::fs::write(session_dir.join("image.png"), b"x").unwrap();

        let catalog = ChapterCatalog::new(dir.path()).with_extensions([".pdf"]);
        let chapters = catalog.list_chapters(&session).await;
        let names: Vec<_> = chapters.iter().map(Chapter::name).collect();
        assert_eq!(names, ["ch1.PDF"]);
    }
}
