use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::level::Level;
use crate::model::mistake::{MistakeInput, MistakeLedger};
use crate::model::remedial::RemedialPlan;
use crate::time::whole_seconds_until;

//
// ─── ATTEMPT RECORD ───────────────────────────────────────────────────────────
//

/// One submitted assessment, kept in order of submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Level number as submitted; may lie outside 1-3.
    pub level: u8,
    pub score: u32,
    pub max_score: u32,
    pub passed: bool,
    pub xp_gained: u32,
    pub timestamp: DateTime<Utc>,
}

//
// ─── LEARNER PROGRESS ─────────────────────────────────────────────────────────
//

/// Progression state of one session.
///
/// `retry_available_at` and `remedial_plan` describe an unresolved failure:
/// they are set by a failed attempt and cleared together, either by a later
/// pass or by [`reconcile`] once the cooldown has run out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProgress {
    #[serde(default)]
    xp: u32,
    #[serde(default)]
    unlocked_level: Level,
    #[serde(default)]
    current_chapter_index: u32,
    #[serde(default)]
    history: Vec<AttemptRecord>,
    #[serde(default)]
    mistakes: MistakeLedger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    retry_available_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remedial_plan: Option<RemedialPlan>,
}

impl LearnerProgress {
    /// Fresh progression: no XP, level 1 of the first chapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn xp(&self) -> u32 {
        self.xp
    }

    #[must_use]
    pub fn unlocked_level(&self) -> Level {
        self.unlocked_level
    }

    #[must_use]
    pub fn current_chapter_index(&self) -> u32 {
        self.current_chapter_index
    }

    #[must_use]
    pub fn history(&self) -> &[AttemptRecord] {
        &self.history
    }

    #[must_use]
    pub fn mistakes(&self) -> &MistakeLedger {
        &self.mistakes
    }

    #[must_use]
    pub fn retry_available_at(&self) -> Option<DateTime<Utc>> {
        self.retry_available_at
    }

    #[must_use]
    pub fn remedial_plan(&self) -> Option<&RemedialPlan> {
        self.remedial_plan.as_ref()
    }

    /// Whole seconds left before a retry is allowed, if any remain.
    #[must_use]
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        self.retry_available_at
            .and_then(|at| whole_seconds_until(now, at))
    }

    /// True when a cooldown is recorded but has already run out at `now`.
    #[must_use]
    pub fn cooldown_expired(&self, now: DateTime<Utc>) -> bool {
        self.retry_available_at.is_some_and(|at| at <= now)
    }

    /// Deduct `amount` XP if the balance covers it.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub fn spend_xp(&mut self, amount: u32) -> bool {
        match self.xp.checked_sub(amount) {
            Some(rest) => {
                self.xp = rest;
                true
            }
            None => false,
        }
    }

    /// Record mistakes at `level`, skipping questions already in the ledger.
    pub fn record_mistakes(
        &mut self,
        level: u8,
        inputs: &[MistakeInput],
        now: DateTime<Utc>,
    ) -> usize {
        self.mistakes.record(level, inputs, now)
    }

    pub fn annotate_mistake(&mut self, question: &str, comment: &str) -> bool {
        self.mistakes.annotate(question, comment)
    }

    /// Store a remedial plan for the failure currently cooling down.
    ///
    /// Ignored when no cooldown is active so the plan never outlives it.
    pub fn attach_remedial_plan(&mut self, plan: RemedialPlan) -> bool {
        if self.retry_available_at.is_none() {
            return false;
        }
        self.remedial_plan = Some(plan);
        true
    }

    pub(crate) fn award(&mut self, xp: u32) {
        self.xp = self.xp.saturating_add(xp);
    }

    pub(crate) fn unlock_at_least(&mut self, level: Level) {
        self.unlocked_level = self.unlocked_level.max(level);
    }

    pub(crate) fn complete_chapter(&mut self) {
        self.current_chapter_index = self.current_chapter_index.saturating_add(1);
        self.unlocked_level = Level::Recall;
    }

    pub(crate) fn start_cooldown(&mut self, until: DateTime<Utc>) {
        self.retry_available_at = Some(until);
    }

    pub(crate) fn clear_cooldown(&mut self) {
        self.retry_available_at = None;
        self.remedial_plan = None;
    }

    pub(crate) fn push_attempt(&mut self, record: AttemptRecord) {
        self.history.push(record);
    }
}

/// Drop an expired cooldown and its remedial plan.
///
/// Run at the start of every read and write of a progression record; there
/// is no background sweep.
#[must_use]
pub fn reconcile(mut progress: LearnerProgress, now: DateTime<Utc>) -> LearnerProgress {
    if progress.cooldown_expired(now) {
        progress.clear_cooldown();
    }
    progress
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
