use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Days a learner has to master a chapter after it was uploaded.
pub const CHAPTER_DEADLINE_DAYS: i64 = 5;

/// One uploaded source document.
///
/// Chapters are never persisted; their index is the position in the
/// upload-time ordering of the session's documents at listing time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    name: String,
    path: PathBuf,
    created_at: DateTime<Utc>,
}

impl Chapter {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, created_at: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            created_at,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn deadline(&self) -> DateTime<Utc> {
        self.created_at + Duration::days(CHAPTER_DEADLINE_DAYS)
    }

    /// Whether the learner is on track for this chapter at `now`.
    #[must_use]
    pub fn pace(&self, now: DateTime<Utc>) -> Pace {
        let deadline = self.deadline();
        if now > deadline {
            Pace::Lagging {
                days_late: (now - deadline).num_days(),
            }
        } else {
            Pace::OnTrack
        }
    }
}

/// Sort chapters oldest first; equal timestamps fall back to name order.
pub fn order_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    OnTrack,
    Lagging { days_late: i64 },
}

impl Pace {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Pace::OnTrack => "on_track",
            Pace::Lagging { .. } => "lagging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn deadline_is_five_days_after_upload() {
        let chapter = Chapter::new("ch1.pdf", "/u/ch1.pdf", fixed_now());
        assert_eq!(chapter.deadline() - chapter.created_at(), Duration::days(5));
    }

    #[test]
    fn pace_floors_days_late() {
        let chapter = Chapter::new("ch1.pdf", "/u/ch1.pdf", fixed_now());
        let deadline = chapter.deadline();

        assert_eq!(chapter.pace(deadline), Pace::OnTrack);
        assert_eq!(
            chapter.pace(deadline + Duration::hours(1)),
            Pace::Lagging { days_late: 0 }
        );
        assert_eq!(
            chapter.pace(deadline + Duration::hours(50)),
            Pace::Lagging { days_late: 2 }
        );
    }

    #[test]
    fn ordering_is_oldest_first() {
        let now = fixed_now();
        let mut chapters = vec![
            Chapter::new("b.pdf", "/u/b.pdf", now + Duration::minutes(5)),
            Chapter::new("c.pdf", "/u/c.pdf", now),
            Chapter::new("a.pdf", "/u/a.pdf", now),
        ];
        order_chapters(&mut chapters);
        let names: Vec<_> = chapters.iter().map(Chapter::name).collect();
        assert_eq!(names, ["a.pdf", "c.pdf", "b.pdf"]);
    }
}
