use std::sync::Arc;

use chrono::Duration;
use log::{info, warn};
use storage::repository::Storage;

use crate::Clock;
use crate::ai::{ChatCompletionsClient, LanguageModel, RemedialPlanner};
use crate::analytics_service::AnalyticsService;
use crate::assessment_service::AssessmentService;
use crate::config::{StoreBackend, StudyConfig};
use crate::documents::{ChapterCatalog, FsTextExtractor, TextExtractor};
use crate::error::AppServicesError;
use crate::mistake_service::MistakeLedgerService;
use crate::progression_service::ProgressionService;

/// Assembles the study services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    catalog: ChapterCatalog,
    progression: Arc<ProgressionService>,
    assessments: Arc<AssessmentService>,
    mistakes: Arc<MistakeLedgerService>,
    analytics: Arc<AnalyticsService>,
}

impl AppServices {
    /// Build services from configuration, using the environment's model
    /// settings and plain-text document extraction.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the `SQLite` backend cannot be opened
    /// or migrated.
    pub async fn from_config(config: &StudyConfig, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = match &config.store {
            StoreBackend::Json => {
                info!("using JSON store under {}", config.data_root.display());
                Storage::json_file(&config.data_root)
            }
            StoreBackend::Sqlite(url) => {
                info!("using SQLite store at {url}");
                Storage::sqlite(url).await?
            }
        };
        let client = ChatCompletionsClient::from_env();
        if !client.enabled() {
            warn!("STUDY_AI_API_KEY is not set; assessments and remedial plans will fail");
        }
        let model: Arc<dyn LanguageModel> = Arc::new(client);
        let extractor: Arc<dyn TextExtractor> = Arc::new(FsTextExtractor);
        Ok(Self::from_parts(config, clock, storage, model, extractor))
    }

    /// Build services over explicit collaborators.
    #[must_use]
    pub fn from_parts(
        config: &StudyConfig,
        clock: Clock,
        storage: Storage,
        model: Arc<dyn LanguageModel>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        let catalog = ChapterCatalog::new(config.upload_root.clone())
            .with_extensions(config.document_extensions.iter().map(String::as_str));

        let progression = Arc::new(
            ProgressionService::new(
                clock,
                Arc::clone(&storage.progress),
                catalog.clone(),
                RemedialPlanner::new(Arc::clone(&model)),
            )
            .with_cooldown(Duration::seconds(config.cooldown_secs)),
        );
        let assessments = Arc::new(
            AssessmentService::new(
                Arc::clone(&storage.progress),
                Arc::clone(&storage.assessments),
                catalog.clone(),
                extractor,
                model,
            )
            .with_context_limit(config.context_limit),
        );
        let mistakes = Arc::new(MistakeLedgerService::new(
            clock,
            Arc::clone(&storage.progress),
        ));
        let analytics = Arc::new(AnalyticsService::new(Arc::clone(&storage.progress)));

        Self {
            catalog,
            progression,
            assessments,
            mistakes,
            analytics,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &ChapterCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn progression(&self) -> Arc<ProgressionService> {
        Arc::clone(&self.progression)
    }

    #[must_use]
    pub fn assessments(&self) -> Arc<AssessmentService> {
        Arc::clone(&self.assessments)
    }

    #[must_use]
    pub fn mistakes(&self) -> Arc<MistakeLedgerService> {
        Arc::clone(&self.mistakes)
    }

    #[must_use]
    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics)
    }
}
