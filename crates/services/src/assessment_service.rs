use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;
use study_core::model::{Assessment, Chapter, Level, Question, SessionId};
use storage::repository::{AssessmentCache, AssessmentKey, ProgressRepository};

use crate::ai::{LanguageModel, parse_structured, prompts::assessment_prompt};
use crate::documents::{ChapterCatalog, DEFAULT_CONTEXT_LIMIT, TextExtractor};
use crate::error::AssessmentError;

/// One level of a chapter as shown in the instructor preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestPreview {
    pub level: Level,
    pub questions: Vec<Question>,
    pub timer_seconds: u32,
}

/// Every chapter of a session with the quests that could be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterPreview {
    pub chapter_name: String,
    pub chapter_index: u32,
    pub quests: Vec<QuestPreview>,
}

/// Produces tiered quizzes for a session's current chapter.
///
/// Generated assessments are cached per (session, chapter, level) and never
/// invalidated; deleting the cached entry forces regeneration.
#[derive(Clone)]
pub struct AssessmentService {
    progress: Arc<dyn ProgressRepository>,
    cache: Arc<dyn AssessmentCache>,
    catalog: ChapterCatalog,
    extractor: Arc<dyn TextExtractor>,
    model: Arc<dyn LanguageModel>,
    context_limit: usize,
}

impl AssessmentService {
    #[must_use]
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        cache: Arc<dyn AssessmentCache>,
        catalog: ChapterCatalog,
        extractor: Arc<dyn TextExtractor>,
        model: Arc<dyn LanguageModel>,
    ) -> Self {
        Self {
            progress,
            cache,
            catalog,
            extractor,
            model,
            context_limit: DEFAULT_CONTEXT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_context_limit(mut self, limit: usize) -> Self {
        self.context_limit = limit;
        self
    }

    /// Quiz of `level` for the session's current chapter.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError` when the session has no documents, every
    /// chapter is already complete, the chapter has no readable text, the
    /// model fails or its output cannot be parsed, or storage fails.
    pub async fn generate_assessment(
        &self,
        session: &SessionId,
        level: Level,
    ) -> Result<Assessment, AssessmentError> {
        let chapter_index = self
            .progress
            .load()
            .await?
            .get(session)
            .map_or(0, |p| p.current_chapter_index());

        let key = AssessmentKey::new(session.clone(), chapter_index, level);
        if let Some(cached) = self.cache.get_assessment(&key).await? {
            debug!("assessment cache hit for {key}");
            return Ok(cached);
        }

        let chapters = self.catalog.list_chapters(session).await;
        if chapters.is_empty() {
            return Err(AssessmentError::NoDocuments);
        }
        let chapter = usize::try_from(chapter_index)
            .ok()
            .and_then(|i| chapters.get(i))
            .ok_or(AssessmentError::AllChaptersComplete)?;

        self.generate_for_chapter(&key, chapter).await
    }

    /// Every chapter of the session with each level that generates cleanly.
    ///
    /// Levels whose content cannot be loaded or generated are left out of
    /// the chapter's quests.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Storage` if the cache cannot be read or
    /// written.
    pub async fn preview_all(
        &self,
        session: &SessionId,
    ) -> Result<Vec<ChapterPreview>, AssessmentError> {
        let chapters = self.catalog.list_chapters(session).await;
        let mut previews = Vec::with_capacity(chapters.len());

        for (index, chapter) in chapters.iter().enumerate() {
            let chapter_index = u32::try_from(index).unwrap_or(u32::MAX);
            let mut quests = Vec::new();
            for level in Level::ALL {
                let key = AssessmentKey::new(session.clone(), chapter_index, level);
                let assessment = match self.cache.get_assessment(&key).await? {
                    Some(cached) => cached,
                    None => match self.generate_for_chapter(&key, chapter).await {
                        Ok(generated) => generated,
                        Err(e @ AssessmentError::Storage(_)) => return Err(e),
                        Err(e) => {
                            debug!("preview skips {key}: {e}");
                            continue;
                        }
                    },
                };
                quests.push(QuestPreview {
                    level,
                    questions: assessment.questions,
                    timer_seconds: assessment.timer_seconds,
                });
            }
            previews.push(ChapterPreview {
                chapter_name: chapter.name().to_string(),
                chapter_index,
                quests,
            });
        }

        Ok(previews)
    }

    async fn generate_for_chapter(
        &self,
        key: &AssessmentKey,
        chapter: &Chapter,
    ) -> Result<Assessment, AssessmentError> {
        let context = self
            .extractor
            .extract_chapter(chapter.path(), self.context_limit)
            .await;
        if context.trim().is_empty() {
            return Err(AssessmentError::EmptyChapter {
                chapter: chapter.name().to_string(),
            });
        }

        let prompt = assessment_prompt(key.level, &context);
        let questions = match self.model.generate(&prompt).await {
            Ok(content) => parse_structured::<Vec<Question>>(&content),
            Err(e) => Err(e),
        }
        .map_err(|e| {
            warn!("assessment generation failed for {key}: {e}");
            AssessmentError::Generation(e)
        })?;

        let assessment = Assessment::new(key.level, chapter.name(), key.chapter_index, questions);
        self.cache.put_assessment(key, &assessment).await?;
        info!(
            "generated {} questions for {key} ({})",
            assessment.questions.len(),
            chapter.name()
        );
        Ok(assessment)
    }
}
