use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A missed question as it arrives with a submitted attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MistakeInput {
    pub question: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
}

impl MistakeInput {
    #[must_use]
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            correct_answer: None,
            explanation: None,
            user_answer: None,
        }
    }

    #[must_use]
    pub fn with_answers(
        mut self,
        user_answer: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        self.user_answer = Some(user_answer.into());
        self.correct_answer = Some(correct_answer.into());
        self
    }
}

/// A ledger entry for a question the learner got wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub question: String,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub user_answer: Option<String>,
    /// Level number as submitted; may lie outside 1-3.
    pub level: u8,
    #[serde(default)]
    pub comments: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only list of mistakes, unique by question text.
///
/// The first recorded occurrence of a question wins; later submissions of the
/// same text are dropped even when the level or answer differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MistakeLedger(Vec<Mistake>);

impl MistakeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Rebuild a ledger from persisted entries, dropping duplicate questions.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Mistake>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            if !ledger.contains(&entry.question) {
                ledger.0.push(entry);
            }
        }
        ledger
    }

    #[must_use]
    pub fn contains(&self, question: &str) -> bool {
        self.0.iter().any(|m| m.question == question)
    }

    /// Record submitted mistakes at `level`, returning how many were new.
    pub fn record(&mut self, level: u8, inputs: &[MistakeInput], now: DateTime<Utc>) -> usize {
        let mut added = 0;
        for input in inputs {
            if self.contains(&input.question) {
                continue;
            }
            self.0.push(Mistake {
                question: input.question.clone(),
                correct_answer: input.correct_answer.clone(),
                explanation: input.explanation.clone(),
                user_answer: input.user_answer.clone(),
                level,
                comments: String::new(),
                timestamp: now,
            });
            added += 1;
        }
        added
    }

    /// Set the comment on the entry whose question matches exactly.
    ///
    /// Returns `false` when no entry matches.
    pub fn annotate(&mut self, question: &str, comment: &str) -> bool {
        match self.0.iter_mut().find(|m| m.question == question) {
            Some(entry) => {
                entry.comments = comment.to_owned();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Mistake] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for MistakeLedger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Vec::<Mistake>::deserialize(deserializer).map(MistakeLedger::from_entries)
    }
}
