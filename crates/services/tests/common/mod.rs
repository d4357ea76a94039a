#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use services::ai::LanguageModel;
use services::documents::TextExtractor;
use services::error::{ExtractError, LlmError};
use storage::repository::{AssessmentCache, AssessmentKey, StorageError};
use study_core::model::{Assessment, SessionId};

/// Replies with the same content to every prompt and counts calls.
pub struct ScriptedModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    pub fn replying(reply: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(LlmError::Disabled)
    }
}

/// Refuses prompts for the synthesis tier and answers the others.
pub struct NoSynthesisModel {
    pub reply: String,
}

#[async_trait]
impl LanguageModel for NoSynthesisModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("Level 3") {
            return Err(LlmError::EmptyResponse);
        }
        Ok(self.reply.clone())
    }
}

/// Returns fixed text for every document.
pub struct FixedText(pub &'static str);

#[async_trait]
impl TextExtractor for FixedText {
    async fn extract(&self, _path: &Path) -> Result<String, ExtractError> {
        Ok(self.0.to_string())
    }
}

pub fn session(id: &str) -> SessionId {
    SessionId::new(id).unwrap()
}

/// Write chapter files under `<root>/<session>/` in the given order.
pub fn upload(root: &Path, session: &str, names: &[&str]) {
    let dir = root.join(session);
    std::fs::create_dir_all(&dir).unwrap();
    for name in names {
        std::fs::write(dir.join(name), format!("contents of {name}")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
}

pub const QUESTIONS_JSON: &str = r#"```json
[
    {
        "id": 1,
        "question": "What is a cell?",
        "options": ["A", "B", "C", "D"],
        "correct_answer": "A",
        "explanation": "Cells are the unit of life.",
        "hints": ["one", "two", "three"]
    }
]
```"#;

pub const REMEDIAL_JSON: &str = r#"{
    "diagnosis": "Confuses mitosis and meiosis",
    "explanation": "Mitosis makes two identical cells.",
    "practice_question": {
        "question": "How many cells does mitosis produce?",
        "options": ["1", "2", "4", "8"],
        "correct_answer": "2",
        "explanation": "Two identical daughter cells."
    }
}"#;

/// Cache that never holds anything and refuses every write.
pub struct ReadOnlyCache;

#[async_trait]
impl AssessmentCache for ReadOnlyCache {
    async fn get_assessment(
        &self,
        _key: &AssessmentKey,
    ) -> Result<Option<Assessment>, StorageError> {
        Ok(None)
    }

    async fn put_assessment(
        &self,
        _key: &AssessmentKey,
        _assessment: &Assessment,
    ) -> Result<(), StorageError> {
        Err(StorageError::Io("read-only file system".into()))
    }
}
