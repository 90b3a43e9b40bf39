use thiserror::Error;

use crate::model::ids::ProblemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PathError {
    #[error("learning path name cannot be empty")]
    EmptyName,
}

/// An ordered curriculum grouping of problem ids.
///
/// The id list is kept verbatim from the source; it may contain duplicates or
/// ids the catalog does not know. Resolution against the catalog filters both
/// (see `Catalog::path_problems`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPath {
    name: String,
    description: String,
    problem_ids: Vec<ProblemId>,
}

impl LearningPath {
    /// Creates a new learning path.
    ///
    /// # Errors
    ///
    /// Returns `PathError::EmptyName` if the name is empty or whitespace-only.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        problem_ids: Vec<ProblemId>,
    ) -> Result<Self, PathError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PathError::EmptyName);
        }

        Ok(Self {
            name: name.trim().to_owned(),
            description: description.into().trim().to_owned(),
            problem_ids,
        })
    }

    // Accessors
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn problem_ids(&self) -> &[ProblemId] {
        &self.problem_ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_rejects_empty_name() {
        let err = LearningPath::new("  ", "intro", vec![]).unwrap_err();
        assert_eq!(err, PathError::EmptyName);
    }

    #[test]
    fn path_trims_name_and_description() {
        let path = LearningPath::new("  Arrays 101  ", "  start here  ", vec![ProblemId::new(1)])
            .unwrap();
        assert_eq!(path.name(), "Arrays 101");
        assert_eq!(path.description(), "start here");
        assert_eq!(path.problem_ids(), &[ProblemId::new(1)]);
    }

    #[test]
    fn path_keeps_id_list_verbatim() {
        let ids = vec![ProblemId::new(1), ProblemId::new(1), ProblemId::new(404)];
        let path = LearningPath::new("Dups", "", ids.clone()).unwrap();
        assert_eq!(path.problem_ids(), ids.as_slice());
    }
}
