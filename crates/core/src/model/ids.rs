use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a classroom/user session.
///
/// Sessions scope every piece of learner state: uploaded chapters,
/// progression, cached assessments and the mistake ledger.
///
/// Deserialization goes through [`SessionId::new`], so stored ids are
/// validated and trimmed like ids from the command line.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a new `SessionId`, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ParseIdError` if the id is empty, is `.` or `..`, or
    /// contains path separators.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
        let raw = id.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) || matches!(trimmed, "." | "..") {
            return Err(ParseIdError { raw });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SessionId::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Error type for parsing a session id from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    raw: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid session id: {:?}", self.raw)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for SessionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::new(s)
    }
}

/// Which sessions a mistake listing should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MistakeScope {
    Session(SessionId),
    /// Fan out over every known session.
    All,
}

impl FromStr for MistakeScope {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "all" {
            return Ok(MistakeScope::All);
        }
        SessionId::new(s).map(MistakeScope::Session)
    }
}
