use serde::Serialize;
use study_core::model::{Chapter, LearnerProgress, Pace};

use chrono::{DateTime, Utc};

pub const ALL_CHAPTERS_MASTERED: &str = "All Chapters Mastered!";

/// Progression of a session plus fields derived from chapters and time.
///
/// Serializes flat: the stored record's fields followed by the derived ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressView {
    #[serde(flatten)]
    pub progress: LearnerProgress,
    pub status: &'static str,
    pub deadline_message: String,
    pub total_chapters: usize,
    pub current_chapter_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_chapter_title: Option<String>,
    /// Whole seconds until a retry is allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_remaining: Option<i64>,
}

impl ProgressView {
    /// Derive the view of an already reconciled record.
    #[must_use]
    pub fn build(progress: LearnerProgress, chapters: &[Chapter], now: DateTime<Utc>) -> Self {
        let index = usize::try_from(progress.current_chapter_index()).unwrap_or(usize::MAX);
        let cooldown_remaining = progress.cooldown_remaining(now);

        let (pace, current_chapter_title, next_chapter_title, deadline_message) =
            match chapters.get(index) {
                Some(chapter) => {
                    let pace = chapter.pace(now);
                    let message = deadline_message(chapter, pace);
                    let next = chapters.get(index + 1).map(|c| c.name().to_string());
                    (pace, chapter.name().to_string(), next, message)
                }
                None => (
                    Pace::OnTrack,
                    ALL_CHAPTERS_MASTERED.to_string(),
                    None,
                    String::new(),
                ),
            };

        Self {
            progress,
            status: pace.label(),
            deadline_message,
            total_chapters: chapters.len(),
            current_chapter_title,
            next_chapter_title,
            cooldown_remaining,
        }
    }
}

fn deadline_message(chapter: &Chapter, pace: Pace) -> String {
    match pace {
        Pace::OnTrack => String::new(),
        Pace::Lagging { days_late } => format!(
            "⚠️ You are {days_late} days late! Deadline for '{}' was {}.",
            chapter.name(),
            chapter.deadline().format("%Y-%m-%d")
        ),
    }
}
