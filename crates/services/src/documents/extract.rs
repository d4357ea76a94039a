use std::path::Path;

use async_trait::async_trait;
use log::warn;

use crate::error::ExtractError;

/// Upper bound on chapter text handed to the model.
pub const DEFAULT_CONTEXT_LIMIT: usize = 40_000;

/// Turns an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract the full text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractError` if the document cannot be read or decoded.
    async fn extract(&self, path: &Path) -> Result<String, ExtractError>;

    /// Text of one chapter, cut to at most `max_chars` characters.
    ///
    /// Failures are logged and yield an empty string.
    async fn extract_chapter(&self, path: &Path, max_chars: usize) -> String {
        match self.extract(path).await {
            Ok(text) => truncate_chars(text, max_chars),
            Err(e) => {
                warn!("error reading chapter {}: {e}", path.display());
                String::new()
            }
        }
    }
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_chars) {
        text.truncate(cut);
    }
    text
}

/// Reads documents that are already UTF-8 text (`.txt`, `.md`, pre-extracted
/// PDFs). Binary documents need a dedicated extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTextExtractor;

#[async_trait]
impl TextExtractor for FsTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = tokio::fs::read(path).await?;
        String::from_utf8(bytes).map_err(|_| ExtractError::NotText(path.display().to_string()))
    }
}
