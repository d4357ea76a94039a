use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("unknown assessment level: {0}")]
    Unknown(u8),
}

//
// ─── LEVEL ────────────────────────────────────────────────────────────────────
//

/// Bloom tier of an assessment within a chapter.
///
/// - `Recall`: definitions and direct facts (10 multiple choice questions)
/// - `Application`: scenarios and case studies (10 multiple choice questions)
/// - `Synthesis`: open-ended creation and evaluation (5 short answers)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    #[default]
    Recall,
    Application,
    Synthesis,
}

/// Flat bonus granted on top of the level-3 reward for clearing a chapter.
pub const CHAPTER_CLEAR_BONUS: u32 = 500;

impl Level {
    pub const ALL: [Level; 3] = [Level::Recall, Level::Application, Level::Synthesis];

    /// Converts a numeric level (1-3) to a `Level`.
    ///
    /// # Errors
    ///
    /// Returns `LevelError::Unknown` if the value is outside 1-3.
    pub fn from_u8(value: u8) -> Result<Self, LevelError> {
        match value {
            1 => Ok(Self::Recall),
            2 => Ok(Self::Application),
            3 => Ok(Self::Synthesis),
            _ => Err(LevelError::Unknown(value)),
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        match self {
            Level::Recall => 1,
            Level::Application => 2,
            Level::Synthesis => 3,
        }
    }

    /// Whether `score` clears this level's threshold.
    #[must_use]
    pub fn passes(self, score: u32) -> bool {
        match self {
            Level::Recall => score >= 8,
            Level::Application => score >= 7,
            Level::Synthesis => score > 0,
        }
    }

    /// Range the random XP reward is drawn from on a pass, bonus excluded.
    #[must_use]
    pub fn xp_range(self) -> RangeInclusive<u32> {
        match self {
            Level::Recall => 50..=100,
            Level::Application => 100..=150,
            Level::Synthesis => 150..=200,
        }
    }

    #[must_use]
    pub fn xp_bonus(self) -> u32 {
        match self {
            Level::Synthesis => CHAPTER_CLEAR_BONUS,
            Level::Recall | Level::Application => 0,
        }
    }

    /// Number of questions a generated assessment of this level contains.
    #[must_use]
    pub fn question_count(self) -> usize {
        match self {
            Level::Recall | Level::Application => 10,
            Level::Synthesis => 5,
        }
    }

    /// The level unlocked by passing this one, if it stays within the chapter.
    #[must_use]
    pub fn next(self) -> Option<Level> {
        match self {
            Level::Recall => Some(Level::Application),
            Level::Application => Some(Level::Synthesis),
            Level::Synthesis => None,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::from_u8(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_level_conversion_works() {
        assert_eq!(Level::from_u8(1).unwrap(), Level::Recall);
        assert_eq!(Level::from_u8(3).unwrap(), Level::Synthesis);
        let err = Level::from_u8(4).unwrap_err();
        assert!(matches!(err, LevelError::Unknown(4)));
        assert!(Level::from_u8(0).is_err());
    }

    #[test]
    fn thresholds_match_bloom_tiers() {
        assert!(!Level::Recall.passes(7));
        assert!(Level::Recall.passes(8));
        assert!(!Level::Application.passes(6));
        assert!(Level::Application.passes(7));
        assert!(!Level::Synthesis.passes(0));
        assert!(Level::Synthesis.passes(1));
    }

    #[test]
    fn only_synthesis_carries_bonus() {
        assert_eq!(Level::Recall.xp_bonus(), 0);
        assert_eq!(Level::Application.xp_bonus(), 0);
        assert_eq!(Level::Synthesis.xp_bonus(), CHAPTER_CLEAR_BONUS);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Level::Application).unwrap(), "2");
        let parsed: Level = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Level::Synthesis);
        assert!(serde_json::from_str::<Level>("7").is_err());
    }
}
