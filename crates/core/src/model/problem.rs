use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::ProblemId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProblemError {
    #[error("problem title cannot be empty")]
    EmptyTitle,

    #[error("problem topic cannot be empty")]
    EmptyTopic,

    #[error("problem link is not a valid URL: {0}")]
    InvalidLink(String),
}

/// Error type for parsing a difficulty or importance label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind} label: {value}")]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a problem.
///
/// Ordering is `Easy < Medium < Hard` and drives recommendation sorting.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers in ascending order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(ParseLabelError {
                kind: "difficulty",
                value: other.to_string(),
            }),
        }
    }
}

//
// ─── IMPORTANCE ────────────────────────────────────────────────────────────────
//

/// Editorial priority tag on a problem.
///
/// High-importance problems are the recommendation candidates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Low => "Low",
            Importance::Medium => "Medium",
            Importance::High => "High",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(Importance::Low),
            "Medium" => Ok(Importance::Medium),
            "High" => Ok(Importance::High),
            other => Err(ParseLabelError {
                kind: "importance",
                value: other.to_string(),
            }),
        }
    }
}

//
// ─── PROBLEM ───────────────────────────────────────────────────────────────────
//

/// Unvalidated problem data as it arrives from the catalog source.
#[derive(Debug, Clone)]
pub struct ProblemDraft {
    pub id: u64,
    pub title: String,
    pub link: String,
    pub difficulty: Difficulty,
    pub topic: String,
    pub patterns: Vec<String>,
    pub companies: Vec<String>,
    pub importance: Importance,
    pub time_complexity: Option<String>,
    pub space_complexity: Option<String>,
    pub hints: Vec<String>,
    pub related: Vec<u64>,
}

impl ProblemDraft {
    /// Minimal draft for the given id, title, and classification.
    ///
    /// Mostly useful in tests and seeding code; catalog loading fills every
    /// field from the source document.
    #[must_use]
    pub fn new(
        id: u64,
        title: impl Into<String>,
        difficulty: Difficulty,
        topic: impl Into<String>,
        importance: Importance,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            link: String::new(),
            difficulty,
            topic: topic.into(),
            patterns: Vec::new(),
            companies: Vec::new(),
            importance,
            time_complexity: None,
            space_complexity: None,
            hints: Vec::new(),
            related: Vec::new(),
        }
    }

    /// Validate the draft into an immutable `Problem`.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError` when the title or topic is empty or the link is
    /// non-empty but not a parseable URL.
    pub fn validate(self) -> Result<Problem, ProblemError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(ProblemError::EmptyTitle);
        }
        let topic = self.topic.trim().to_owned();
        if topic.is_empty() {
            return Err(ProblemError::EmptyTopic);
        }
        if !self.link.is_empty() {
            Url::parse(&self.link).map_err(|e| ProblemError::InvalidLink(e.to_string()))?;
        }

        Ok(Problem {
            id: ProblemId::new(self.id),
            title,
            link: self.link,
            difficulty: self.difficulty,
            topic,
            patterns: self.patterns,
            companies: self.companies,
            importance: self.importance,
            time_complexity: self.time_complexity,
            space_complexity: self.space_complexity,
            hints: self.hints,
            related: self.related.into_iter().map(ProblemId::new).collect(),
        })
    }
}

/// A catalog entry: one practice problem with its classification and
/// editorial metadata.
///
/// Immutable once loaded; related ids may reference problems the catalog does
/// not contain and are resolved leniently by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    id: ProblemId,
    title: String,
    link: String,
    difficulty: Difficulty,
    topic: String,
    patterns: Vec<String>,
    companies: Vec<String>,
    importance: Importance,
    time_complexity: Option<String>,
    space_complexity: Option<String>,
    hints: Vec<String>,
    related: Vec<ProblemId>,
}

impl Problem {
    // Accessors
    #[must_use]
    pub fn id(&self) -> ProblemId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// External link, empty when the source provided none.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    #[must_use]
    pub fn importance(&self) -> Importance {
        self.importance
    }

    #[must_use]
    pub fn time_complexity(&self) -> Option<&str> {
        self.time_complexity.as_deref()
    }

    #[must_use]
    pub fn space_complexity(&self) -> Option<&str> {
        self.space_complexity.as_deref()
    }

    #[must_use]
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    #[must_use]
    pub fn related(&self) -> &[ProblemId] {
        &self.related
    }

    /// Exact pattern membership, as the catalog source spells it.
    #[must_use]
    pub fn has_pattern(&self, pattern: &str) -> bool {
        self.patterns.iter().any(|p| p == pattern)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
