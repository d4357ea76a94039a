use serde::{Deserialize, Serialize};

use crate::model::level::Level;

/// Time allowed for any generated assessment.
pub const ASSESSMENT_TIMER_SECS: u32 = 600;

/// One generated quiz item.
///
/// Multiple-choice tiers fill `options` and `correct_answer`; the synthesis
/// tier uses `kind = "short_answer"` and keeps grading notes in `explanation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A cached, generated quiz for one level of one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub level: Level,
    pub timer_seconds: u32,
    pub questions: Vec<Question>,
    pub chapter_name: String,
    #[serde(default)]
    pub chapter_index: u32,
}

impl Assessment {
    #[must_use]
    pub fn new(
        level: Level,
        chapter_name: impl Into<String>,
        chapter_index: u32,
        questions: Vec<Question>,
    ) -> Self {
        Self {
            level,
            timer_seconds: ASSESSMENT_TIMER_SECS,
            questions,
            chapter_name: chapter_name.into(),
            chapter_index,
        }
    }
}
