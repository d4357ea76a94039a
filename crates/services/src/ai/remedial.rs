use std::sync::Arc;

use log::warn;
use study_core::model::{MistakeInput, RemedialPlan};

use super::client::LanguageModel;
use super::parse::parse_structured;
use super::prompts::remedial_prompt;

/// Turns the mistakes of a failed attempt into a tutoring plan.
#[derive(Clone)]
pub struct RemedialPlanner {
    model: Arc<dyn LanguageModel>,
}

impl RemedialPlanner {
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Ask the model for a plan.
    ///
    /// Returns `None` when there is nothing to diagnose. Model or parse
    /// failures yield [`RemedialPlan::fallback`].
    pub async fn plan(&self, mistakes: &[MistakeInput]) -> Option<RemedialPlan> {
        if mistakes.is_empty() {
            return None;
        }
        let prompt = remedial_prompt(mistakes);
        let plan = match self.model.generate(&prompt).await {
            Ok(content) => parse_structured::<RemedialPlan>(&content),
            Err(e) => Err(e),
        };
        match plan {
            Ok(plan) => Some(plan),
            Err(e) => {
                warn!("remedial plan generation failed: {e}");
                Some(RemedialPlan::fallback())
            }
        }
    }
}
