use std::sync::Arc;

use log::debug;
use serde::Serialize;
use study_core::model::{Mistake, MistakeScope, SessionId, reconcile};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::error::LedgerError;

/// A mistake as listed by the ledger.
///
/// `session_id` is only filled when listing across every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(flatten)]
    pub mistake: Mistake,
}

/// Read and annotate the per-session mistake ledgers.
#[derive(Clone)]
pub struct MistakeLedgerService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl MistakeLedgerService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Mistakes of one session, or of every session tagged with its id.
    ///
    /// An unknown session lists nothing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if progression cannot be loaded.
    pub async fn get_mistakes(&self, scope: MistakeScope) -> Result<Vec<LedgerEntry>, LedgerError> {
        let all = self.progress.load().await?;
        let entries = match scope {
            MistakeScope::Session(session) => all
                .get(&session)
                .map(|p| {
                    p.mistakes()
                        .entries()
                        .iter()
                        .cloned()
                        .map(|mistake| LedgerEntry {
                            session_id: None,
                            mistake,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            MistakeScope::All => all
                .iter()
                .flat_map(|(session, p)| {
                    p.mistakes().entries().iter().map(|mistake| LedgerEntry {
                        session_id: Some(session.clone()),
                        mistake: mistake.clone(),
                    })
                })
                .collect(),
        };
        Ok(entries)
    }

    /// Set the comment on the first mistake whose text is exactly `question`.
    ///
    /// Returns `false` without saving when the session or question is
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if progression cannot be loaded or
    /// saved.
    pub async fn update_mistake_comment(
        &self,
        session: &SessionId,
        question: &str,
        comment: &str,
    ) -> Result<bool, LedgerError> {
        let now = self.clock.now();
        let mut all = self.progress.load().await?;
        let Some(stored) = all.get(session) else {
            return Ok(false);
        };

        let mut progress = reconcile(stored.clone(), now);
        if !progress.annotate_mistake(question, comment) {
            debug!("session {session}: no mistake matches {question:?}");
            return Ok(false);
        }
        all.insert(session.clone(), progress);
        self.progress.save(&all).await?;
        Ok(true)
    }
}
