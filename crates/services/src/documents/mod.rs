mod catalog;
mod extract;

pub use catalog::{ChapterCatalog, DEFAULT_DOCUMENT_EXTENSIONS};
pub use extract::{DEFAULT_CONTEXT_LIMIT, FsTextExtractor, TextExtractor};
