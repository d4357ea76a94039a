use serde::{Deserialize, Serialize};

/// Single-choice question used to verify a corrected misunderstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// Diagnostic tutoring produced after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemedialPlan {
    pub diagnosis: String,
    pub explanation: String,
    #[serde(default)]
    pub practice_question: Option<PracticeQuestion>,
}

impl RemedialPlan {
    /// Plan stored when the tutor model could not produce one.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            diagnosis: "General Review Needed".to_owned(),
            explanation: "Please review the material again.".to_owned(),
            practice_question: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_no_practice_question() {
        let plan = RemedialPlan::fallback();
        assert_eq!(plan.diagnosis, "General Review Needed");
        assert!(plan.practice_question.is_none());
    }

    #[test]
    fn parses_tutor_output() {
        let raw = r#"{
            "diagnosis": "Concept Gap: confused mitosis and meiosis",
            "explanation": "Mitosis yields two identical cells.",
            "practice_question": {
                "question": "How many daughter cells does mitosis produce?",
                "options": ["1", "2", "4", "8"],
                "correct_answer": "2",
                "explanation": "One division, two cells."
            }
        }"#;
        let plan: RemedialPlan = serde_json::from_str(raw).unwrap();
        let practice = plan.practice_question.unwrap();
        assert_eq!(practice.options.len(), 4);
        assert_eq!(practice.correct_answer.as_deref(), Some("2"));
    }

    #[test]
    fn null_practice_question_is_accepted() {
        let raw = r#"{"diagnosis": "d", "explanation": "e", "practice_question": null}"#;
        let plan: RemedialPlan = serde_json::from_str(raw).unwrap();
        assert!(plan.practice_question.is_none());
    }
}
