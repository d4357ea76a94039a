use chrono::{DateTime, Duration, Utc};

/// Source of "now" for cooldowns and chapter deadlines.
///
/// Services hold a `Clock` instead of calling `Utc::now()` so a test can pin
/// the time and step past a cooldown.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Move a fixed clock forward by `delta`. The system clock is unaffected.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// A copy of this clock moved forward by `delta`.
    #[must_use]
    pub fn advanced(mut self, delta: Duration) -> Self {
        self.advance(delta);
        self
    }
}

/// Whole seconds from `now` until `at`, or `None` once fewer than one remains.
#[must_use]
pub fn whole_seconds_until(now: DateTime<Utc>, at: DateTime<Utc>) -> Option<i64> {
    Some((at - now).num_seconds()).filter(|secs| *secs > 0)
}

/// Pinned test instant (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// The pinned test instant as a `DateTime<Utc>`.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}
