#![forbid(unsafe_code)]

pub mod ai;
pub mod analytics_service;
pub mod app_services;
pub mod assessment_service;
pub mod config;
pub mod documents;
pub mod error;
pub mod mistake_service;
pub mod progress_view;
pub mod progression_service;

pub use study_core::Clock;

pub use analytics_service::{AnalyticsService, ClassOverview};
pub use app_services::AppServices;
pub use assessment_service::{AssessmentService, ChapterPreview, QuestPreview};
pub use config::{StoreBackend, StudyConfig};
pub use error::{AppServicesError, AssessmentError, LedgerError, LlmError, ProgressionError};
pub use mistake_service::{LedgerEntry, MistakeLedgerService};
pub use progress_view::ProgressView;
pub use progression_service::ProgressionService;
