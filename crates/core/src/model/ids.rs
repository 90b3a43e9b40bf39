use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a catalog problem.
///
/// Ids are assigned by the catalog source and never generated at runtime.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProblemId(u64);

impl ProblemId {
    /// Creates a new `ProblemId`
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying u64 value
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProblemId({})", self.0)
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing an id from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError;

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse ProblemId from string")
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for ProblemId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(ProblemId::new).map_err(|_| ParseIdError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_id_display() {
        let id = ProblemId::new(42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn problem_id_from_str() {
        let id: ProblemId = "123".parse().unwrap();
        assert_eq!(id, ProblemId::new(123));
    }

    #[test]
    fn problem_id_from_str_invalid() {
        let result = "not-a-number".parse::<ProblemId>();
        assert!(result.is_err());
    }

    #[test]
    fn problem_id_roundtrip() {
        let original = ProblemId::new(42);
        let deserialized: ProblemId = original.to_string().parse().unwrap();
        assert_eq!(original, deserialized);
    }
}
