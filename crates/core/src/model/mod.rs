mod assessment;
mod chapter;
mod ids;
mod level;
mod mistake;
mod progress;
mod remedial;

pub use assessment::{ASSESSMENT_TIMER_SECS, Assessment, Question};
pub use chapter::{CHAPTER_DEADLINE_DAYS, Chapter, Pace, order_chapters};
pub use ids::{MistakeScope, ParseIdError, SessionId};
pub use level::{CHAPTER_CLEAR_BONUS, Level, LevelError};
pub use mistake::{Mistake, MistakeInput, MistakeLedger};
pub use progress::{AttemptRecord, LearnerProgress, reconcile};
pub use remedial::{PracticeQuestion, RemedialPlan};
