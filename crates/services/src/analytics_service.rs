use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use study_core::model::Level;
use storage::repository::ProgressRepository;

use crate::error::LedgerError;

const CONCEPT_PREVIEW_CHARS: usize = 50;
const TOP_MISTAKES: usize = 3;

/// Learners per unlocked level; `completed` counts anyone past the first chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LevelDistribution {
    pub level_1: usize,
    pub level_2: usize,
    pub level_3: usize,
    pub completed: usize,
}

/// Mean attempts per learner at each level. Unknown levels are not counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageAttempts {
    pub level_1: f64,
    pub level_2: f64,
    pub level_3: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonMistake {
    pub concept: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassOverview {
    pub total_learners: usize,
    pub level_distribution: LevelDistribution,
    pub average_attempts: AverageAttempts,
    pub common_mistakes: Vec<CommonMistake>,
}

/// Aggregates stored progression across every session.
#[derive(Clone)]
pub struct AnalyticsService {
    progress: Arc<dyn ProgressRepository>,
}

impl AnalyticsService {
    #[must_use]
    pub fn new(progress: Arc<dyn ProgressRepository>) -> Self {
        Self { progress }
    }

    /// Class-wide summary of levels, attempts and recurring mistakes.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if progression cannot be loaded.
    pub async fn class_overview(&self) -> Result<ClassOverview, LedgerError> {
        let all = self.progress.load().await?;
        let total = all.len();
        if total == 0 {
            return Ok(ClassOverview::default());
        }

        let mut distribution = LevelDistribution::default();
        let mut attempts = [0usize; 3];
        let mut frequency: HashMap<&str, usize> = HashMap::new();

        for progress in all.values() {
            if progress.current_chapter_index() > 0 {
                distribution.completed += 1;
            } else {
                match progress.unlocked_level() {
                    Level::Recall => distribution.level_1 += 1,
                    Level::Application => distribution.level_2 += 1,
                    Level::Synthesis => distribution.level_3 += 1,
                }
            }
            for attempt in progress.history() {
                if let Some(count) = usize::from(attempt.level)
                    .checked_sub(1)
                    .and_then(|slot| attempts.get_mut(slot))
                {
                    *count += 1;
                }
            }
            for mistake in progress.mistakes().entries() {
                *frequency.entry(mistake.question.as_str()).or_default() += 1;
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let mean = |count: usize| count as f64 / total as f64;

        let mut ranked: Vec<(&str, usize)> = frequency.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        let common_mistakes = ranked
            .into_iter()
            .take(TOP_MISTAKES)
            .map(|(question, frequency)| CommonMistake {
                concept: concept_preview(question),
                frequency,
            })
            .collect();

        Ok(ClassOverview {
            total_learners: total,
            level_distribution: distribution,
            average_attempts: AverageAttempts {
                level_1: mean(attempts[0]),
                level_2: mean(attempts[1]),
                level_3: mean(attempts[2]),
            },
            common_mistakes,
        })
    }
}

fn concept_preview(question: &str) -> String {
    match question.char_indices().nth(CONCEPT_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &question[..cut]),
        None => question.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_concepts_are_kept_whole() {
        assert_eq!(concept_preview("What is a cell?"), "What is a cell?");
    }

    #[test]
    fn long_concepts_are_cut_at_fifty_chars() {
        let question = "x".repeat(60);
        let preview = concept_preview(&question);
        assert_eq!(preview, format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn exactly_fifty_chars_has_no_ellipsis() {
        let question = "é".repeat(50);
        assert_eq!(concept_preview(&question), question);
    }
}
