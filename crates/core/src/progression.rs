//! Transition rules for a learner advancing through levels and chapters.
//!
//! State is the tuple (unlocked level, chapter index, cooldown). A submitted
//! score is graded against the level threshold; a pass awards XP and unlocks
//! the next tier, a level-3 pass clears the chapter, and a fail starts a
//! retry cooldown. Submissions are not checked against the unlocked level.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{AttemptRecord, LearnerProgress, Level, MistakeInput, reconcile};

/// Cooldown after a failed attempt before a retry is allowed.
pub const DEFAULT_COOLDOWN_SECS: i64 = 600;

/// A scored assessment as reported by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Raw level number; values outside 1-3 are graded as a fail.
    pub level: u8,
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub mistakes: Vec<MistakeInput>,
}

impl Submission {
    #[must_use]
    pub fn new(level: u8, score: u32, max_score: u32) -> Self {
        Self {
            level,
            score,
            max_score,
            mistakes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_mistakes(mut self, mistakes: Vec<MistakeInput>) -> Self {
        self.mistakes = mistakes;
        self
    }
}

/// What a submission reports back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub passed: bool,
    pub xp_gained: u32,
    pub new_total_xp: u32,
    pub unlocked_level: Level,
    pub score: u32,
}

/// Which edge of the state machine a submission took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Level 1 or 2 passed; the next tier is unlocked.
    Passed,
    /// Level 3 passed; the chapter index moved forward.
    ChapterCleared,
    /// Threshold missed; a cooldown is running.
    Failed { remedial_needed: bool },
    /// Level outside 1-3. Graded as a fail with no XP and no unlock.
    UnknownLevel { level: u8, remedial_needed: bool },
}

impl Outcome {
    /// Whether the caller should ask for a remedial plan.
    #[must_use]
    pub fn remedial_needed(self) -> bool {
        match self {
            Outcome::Failed { remedial_needed } | Outcome::UnknownLevel { remedial_needed, .. } => {
                remedial_needed
            }
            Outcome::Passed | Outcome::ChapterCleared => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub result: SubmissionResult,
    pub outcome: Outcome,
}

/// The progression state machine.
#[derive(Debug, Clone, Copy)]
pub struct Progression {
    cooldown: Duration,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_COOLDOWN_SECS))
    }
}

impl Progression {
    #[must_use]
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    #[must_use]
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Apply a submission to `progress` at `now`.
    ///
    /// The XP reward is drawn from `rng`. Remedial plan generation is left to
    /// the caller, signalled by [`Outcome::remedial_needed`].
    pub fn submit<R: Rng>(
        &self,
        progress: &mut LearnerProgress,
        submission: &Submission,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Transition {
        *progress = reconcile(std::mem::take(progress), now);

        let level = Level::from_u8(submission.level).ok();
        let passed = level.is_some_and(|level| level.passes(submission.score));
        let remedial_needed = !submission.mistakes.is_empty();
        let mut xp_gained = 0;
        let outcome = match level {
            Some(level) if passed => {
                xp_gained = rng.random_range(level.xp_range()) + level.xp_bonus();
                progress.award(xp_gained);
                progress.clear_cooldown();
                match level.next() {
                    Some(next) => {
                        progress.unlock_at_least(next);
                        Outcome::Passed
                    }
                    None => {
                        progress.complete_chapter();
                        Outcome::ChapterCleared
                    }
                }
            }
            Some(_) => {
                progress.start_cooldown(now + self.cooldown);
                Outcome::Failed { remedial_needed }
            }
            None => {
                progress.start_cooldown(now + self.cooldown);
                Outcome::UnknownLevel {
                    level: submission.level,
                    remedial_needed,
                }
            }
        };

        progress.push_attempt(AttemptRecord {
            level: submission.level,
            score: submission.score,
            max_score: submission.max_score,
            passed,
            xp_gained,
            timestamp: now,
        });
        progress.record_mistakes(submission.level, &submission.mistakes, now);

        Transition {
            result: snapshot(progress, passed, xp_gained, submission.score),
            outcome,
        }
    }
}

fn snapshot(
    progress: &LearnerProgress,
    passed: bool,
    xp_gained: u32,
    score: u32,
) -> SubmissionResult {
    SubmissionResult {
        passed,
        xp_gained,
        new_total_xp: progress.xp(),
        unlocked_level: progress.unlocked_level(),
        score,
    }
}
