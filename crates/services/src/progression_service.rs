use std::sync::{Arc, Mutex};

use chrono::Duration;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use study_core::model::{LearnerProgress, SessionId, reconcile};
use study_core::progression::{Outcome, Progression, Submission, SubmissionResult};
use storage::repository::ProgressRepository;

use crate::Clock;
use crate::ai::RemedialPlanner;
use crate::documents::ChapterCatalog;
use crate::error::ProgressionError;
use crate::progress_view::ProgressView;

/// Applies submissions to stored progression and answers progress queries.
///
/// Every call loads the whole progression mapping and, when something
/// changed, saves it back. There is no locking: two concurrent writers race
/// and the last save wins for every session.
#[derive(Clone)]
pub struct ProgressionService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
    catalog: ChapterCatalog,
    remedial: RemedialPlanner,
    machine: Progression,
    rng: Arc<Mutex<StdRng>>,
}

impl ProgressionService {
    #[must_use]
    pub fn new(
        clock: Clock,
        progress: Arc<dyn ProgressRepository>,
        catalog: ChapterCatalog,
        remedial: RemedialPlanner,
    ) -> Self {
        Self {
            clock,
            progress,
            catalog,
            remedial,
            machine: Progression::default(),
            rng: Arc::new(Mutex::new(StdRng::from_os_rng())),
        }
    }

    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.machine = Progression::new(cooldown);
        self
    }

    /// Draw XP rewards from a seeded generator (deterministic tests).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Arc::new(Mutex::new(StdRng::seed_from_u64(seed)));
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Grade a submitted assessment and advance the session's progression.
    ///
    /// The level is not checked against the session's unlocked level. A
    /// level outside 1-3 cannot pass: it starts the cooldown and is recorded
    /// like any other failed attempt.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Storage` if progression cannot be loaded
    /// or saved.
    pub async fn submit_assessment_result(
        &self,
        session: &SessionId,
        submission: Submission,
    ) -> Result<SubmissionResult, ProgressionError> {
        let now = self.clock.now();
        let mut all = self.progress.load().await?;
        let mut progress = all.get(session).cloned().unwrap_or_default();

        let transition = {
            let mut rng = self.rng.lock().map_err(|_| ProgressionError::Poisoned)?;
            self.machine.submit(&mut progress, &submission, now, &mut *rng)
        };

        if transition.outcome.remedial_needed() {
            if let Some(plan) = self.remedial.plan(&submission.mistakes).await {
                progress.attach_remedial_plan(plan);
            }
        }
        match transition.outcome {
            Outcome::UnknownLevel { level, .. } => {
                warn!("session {session}: level {level} is not 1-3, graded as a fail");
            }
            Outcome::ChapterCleared => {
                info!(
                    "session {session} cleared a chapter, now on chapter index {}",
                    progress.current_chapter_index()
                );
            }
            Outcome::Passed | Outcome::Failed { .. } => {}
        }

        debug!(
            "session {session}: level {} score {}/{} passed={} xp+{}",
            submission.level,
            submission.score,
            submission.max_score,
            transition.result.passed,
            transition.result.xp_gained
        );

        all.insert(session.clone(), progress);
        self.progress.save(&all).await?;
        Ok(transition.result)
    }

    /// Current progression with chapter, pace and cooldown details.
    ///
    /// An expired cooldown is cleared here and the cleared record persisted.
    /// Unknown sessions report a fresh record without creating one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Storage` if progression cannot be loaded
    /// or saved.
    pub async fn get_progress(
        &self,
        session: &SessionId,
    ) -> Result<ProgressView, ProgressionError> {
        let now = self.clock.now();
        let mut all = self.progress.load().await?;

        let progress = match all.get(session) {
            Some(stored) if stored.cooldown_expired(now) => {
                let cleared = reconcile(stored.clone(), now);
                all.insert(session.clone(), cleared.clone());
                self.progress.save(&all).await?;
                debug!("session {session}: expired cooldown cleared");
                cleared
            }
            Some(stored) => stored.clone(),
            None => LearnerProgress::new(),
        };

        let chapters = self.catalog.list_chapters(session).await;
        Ok(ProgressView::build(progress, &chapters, now))
    }

    /// Deduct XP from a session.
    ///
    /// Returns `false` without changing anything when the session is unknown
    /// or its balance is below `amount`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Storage` if progression cannot be loaded
    /// or saved.
    pub async fn spend_xp(
        &self,
        session: &SessionId,
        amount: u32,
    ) -> Result<bool, ProgressionError> {
        let now = self.clock.now();
        let mut all = self.progress.load().await?;
        let Some(stored) = all.get(session) else {
            return Ok(false);
        };

        let mut progress = reconcile(stored.clone(), now);
        if !progress.spend_xp(amount) {
            return Ok(false);
        }
        all.insert(session.clone(), progress);
        self.progress.save(&all).await?;
        Ok(true)
    }
}
