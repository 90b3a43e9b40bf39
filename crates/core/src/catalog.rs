use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::model::{Difficulty, LearningPath, Problem, ProblemId};

/// Immutable reference data: the problem set, learning paths, topics, and
/// patterns, in configuration order.
///
/// Constructed once at startup and passed to whoever needs it; there is no
/// ambient global. A missing or malformed configuration source yields
/// `Catalog::empty()` and the rest of the system tolerates it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    problems: Vec<Problem>,
    index: HashMap<ProblemId, usize>,
    paths: BTreeMap<String, LearningPath>,
    topics: Vec<String>,
    patterns: Vec<String>,
}

impl Catalog {
    /// Builds a catalog from already-validated parts.
    ///
    /// Problems keep their given order; a duplicated id keeps its first
    /// occurrence in the lookup index.
    #[must_use]
    pub fn new(
        problems: Vec<Problem>,
        paths: BTreeMap<String, LearningPath>,
        topics: Vec<String>,
        patterns: Vec<String>,
    ) -> Self {
        let mut index = HashMap::with_capacity(problems.len());
        for (position, problem) in problems.iter().enumerate() {
            index.entry(problem.id()).or_insert(position);
        }
        Self {
            problems,
            index,
            paths,
            topics,
            patterns,
        }
    }

    /// The degraded-startup catalog: no problems, no paths.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: ProblemId) -> Option<&Problem> {
        self.index.get(&id).map(|&position| &self.problems[position])
    }

    /// All problems in configuration order.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    #[must_use]
    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|p| p.difficulty() == difficulty)
            .collect()
    }

    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Vec<&Problem> {
        self.problems.iter().filter(|p| p.topic() == topic).collect()
    }

    #[must_use]
    pub fn by_pattern(&self, pattern: &str) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|p| p.has_pattern(pattern))
            .collect()
    }

    /// Problems whose title contains the query (case-insensitive), whose id
    /// contains it as a string, or with a pattern containing it
    /// (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Problem> {
        let needle = query.to_lowercase();
        self.problems
            .iter()
            .filter(|p| {
                p.title().to_lowercase().contains(&needle)
                    || p.id().to_string().contains(&needle)
                    || p.patterns()
                        .iter()
                        .any(|pattern| pattern.to_lowercase().contains(&needle))
            })
            .collect()
    }

    #[must_use]
    pub fn learning_paths(&self) -> &BTreeMap<String, LearningPath> {
        &self.paths
    }

    #[must_use]
    pub fn path(&self, key: &str) -> Option<&LearningPath> {
        self.paths.get(key)
    }

    /// Resolve a learning path's id list against the catalog.
    ///
    /// Stale ids and duplicate repetitions are dropped silently; the first
    /// occurrence of each problem wins. Unknown path keys resolve to an
    /// empty list.
    #[must_use]
    pub fn path_problems(&self, key: &str) -> Vec<&Problem> {
        let Some(path) = self.paths.get(key) else {
            return Vec::new();
        };
        let mut seen = BTreeSet::new();
        path.problem_ids()
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.get(*id))
            .collect()
    }

    /// Resolve a problem's related ids, dropping stale ones silently.
    #[must_use]
    pub fn related_problems(&self, problem: &Problem) -> Vec<&Problem> {
        problem.related().iter().filter_map(|id| self.get(*id)).collect()
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Apply a multi-criteria filter; solved-status visibility is evaluated
    /// against the given solved set.
    #[must_use]
    pub fn filtered(&self, filter: &ProblemFilter, solved: &BTreeSet<ProblemId>) -> Vec<&Problem> {
        self.problems
            .iter()
            .filter(|p| filter.matches(p, solved))
            .collect()
    }
}

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Multi-criteria problem filter for listing views.
///
/// An empty criterion list means "no constraint"; both visibility flags
/// default to showing everything.
#[derive(Debug, Clone)]
pub struct ProblemFilter {
    difficulties: Vec<Difficulty>,
    topics: Vec<String>,
    patterns: Vec<String>,
    companies: Vec<String>,
    show_solved: bool,
    show_unsolved: bool,
}

impl Default for ProblemFilter {
    fn default() -> Self {
        Self {
            difficulties: Vec::new(),
            topics: Vec::new(),
            patterns: Vec::new(),
            companies: Vec::new(),
            show_solved: true,
            show_unsolved: true,
        }
    }
}

impl ProblemFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_difficulties(mut self, difficulties: Vec<Difficulty>) -> Self {
        self.difficulties = difficulties;
        self
    }

    #[must_use]
    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    #[must_use]
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    #[must_use]
    pub fn with_companies(mut self, companies: Vec<String>) -> Self {
        self.companies = companies;
        self
    }

    /// Hide problems that are in the solved set.
    #[must_use]
    pub fn hide_solved(mut self) -> Self {
        self.show_solved = false;
        self
    }

    /// Hide problems that are not in the solved set.
    #[must_use]
    pub fn hide_unsolved(mut self) -> Self {
        self.show_unsolved = false;
        self
    }

    #[must_use]
    pub fn matches(&self, problem: &Problem, solved: &BTreeSet<ProblemId>) -> bool {
        if !self.difficulties.is_empty() && !self.difficulties.contains(&problem.difficulty()) {
            return false;
        }
        if !self.topics.is_empty() && !self.topics.iter().any(|t| t == problem.topic()) {
            return false;
        }
        if !self.patterns.is_empty() && !self.patterns.iter().any(|p| problem.has_pattern(p)) {
            return false;
        }
        if !self.companies.is_empty()
            && !self
                .companies
                .iter()
                .any(|c| problem.companies().iter().any(|pc| pc == c))
        {
            return false;
        }
        let is_solved = solved.contains(&problem.id());
        if is_solved && !self.show_solved {
            return false;
        }
        if !is_solved && !self.show_unsolved {
            return false;
        }
        true
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Importance, ProblemDraft};

    fn problem(id: u64, title: &str, difficulty: Difficulty, topic: &str) -> Problem {
        ProblemDraft::new(id, title, difficulty, topic, Importance::Medium)
            .validate()
            .unwrap()
    }

    fn sample_catalog() -> Catalog {
        let mut two_sum =
            ProblemDraft::new(1, "Two Sum", Difficulty::Easy, "Array", Importance::High);
        two_sum.patterns = vec!["Hash Map".to_string()];
        two_sum.companies = vec!["Acme".to_string()];

        let mut paths = BTreeMap::new();
        paths.insert(
            "arrays".to_string(),
            LearningPath::new(
                "Arrays 101",
                "start here",
                vec![
                    ProblemId::new(1),
                    ProblemId::new(1),
                    ProblemId::new(404),
                    ProblemId::new(3),
                ],
            )
            .unwrap(),
        );

        Catalog::new(
            vec![
                two_sum.validate().unwrap(),
                problem(2, "Course Schedule", Difficulty::Medium, "Graph"),
                problem(3, "Merge Intervals", Difficulty::Medium, "Array"),
            ],
            paths,
            vec!["Array".to_string(), "Graph".to_string()],
            vec!["Hash Map".to_string()],
        )
    }

    #[test]
    fn get_unknown_id_is_none() {
        let catalog = sample_catalog();
        assert!(catalog.get(ProblemId::new(404)).is_none());
    }

    #[test]
    fn problems_keep_configuration_order() {
        let catalog = sample_catalog();
        let ids: Vec<u64> = catalog.problems().iter().map(|p| p.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn by_difficulty_and_topic_filter() {
        let catalog = sample_catalog();
        assert_eq!(catalog.by_difficulty(Difficulty::Medium).len(), 2);
        assert_eq!(catalog.by_topic("Array").len(), 2);
        assert_eq!(catalog.by_pattern("Hash Map").len(), 1);
        assert!(catalog.by_pattern("hash map").is_empty());
    }

    #[test]
    fn search_matches_title_id_and_pattern() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search("two").len(), 1);
        assert_eq!(catalog.search("3").len(), 1);
        assert_eq!(catalog.search("hash").len(), 1);
        assert!(catalog.search("zebra").is_empty());
    }

    #[test]
    fn path_problems_drop_stale_and_duplicate_ids() {
        let catalog = sample_catalog();
        let resolved: Vec<u64> = catalog
            .path_problems("arrays")
            .iter()
            .map(|p| p.id().value())
            .collect();
        assert_eq!(resolved, vec![1, 3]);
    }

    #[test]
    fn unknown_path_resolves_empty() {
        let catalog = sample_catalog();
        assert!(catalog.path_problems("nope").is_empty());
    }

    #[test]
    fn related_problems_drop_stale_ids() {
        let catalog = sample_catalog();
        let mut draft = ProblemDraft::new(9, "Probe", Difficulty::Easy, "Array", Importance::Low);
        draft.related = vec![2, 9999];
        let probe = draft.validate().unwrap();

        let related: Vec<u64> = catalog
            .related_problems(&probe)
            .iter()
            .map(|p| p.id().value())
            .collect();
        assert_eq!(related, vec![2]);
    }

    #[test]
    fn empty_catalog_answers_everything() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.search("anything").is_empty());
        assert!(catalog.path_problems("arrays").is_empty());
        assert!(catalog.learning_paths().is_empty());
    }

    #[test]
    fn filter_combines_criteria() {
        let catalog = sample_catalog();
        let solved = BTreeSet::from([ProblemId::new(1)]);

        let filter = ProblemFilter::new()
            .with_topics(vec!["Array".to_string()])
            .hide_solved();
        let kept: Vec<u64> = catalog
            .filtered(&filter, &solved)
            .iter()
            .map(|p| p.id().value())
            .collect();
        assert_eq!(kept, vec![3]);

        let filter = ProblemFilter::new().hide_unsolved();
        let kept: Vec<u64> = catalog
            .filtered(&filter, &solved)
            .iter()
            .map(|p| p.id().value())
            .collect();
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn filter_by_company_and_difficulty() {
        let catalog = sample_catalog();
        let solved = BTreeSet::new();

        let filter = ProblemFilter::new()
            .with_companies(vec!["Acme".to_string()])
            .with_difficulties(vec![Difficulty::Easy]);
        assert_eq!(catalog.filtered(&filter, &solved).len(), 1);

        let filter = ProblemFilter::new().with_companies(vec!["Nowhere".to_string()]);
        assert!(catalog.filtered(&filter, &solved).is_empty());
    }

    #[test]
    fn duplicate_problem_id_keeps_first_occurrence() {
        let catalog = Catalog::new(
            vec![
                problem(1, "First", Difficulty::Easy, "Array"),
                problem(1, "Shadowed", Difficulty::Hard, "Graph"),
            ],
            BTreeMap::new(),
            vec![],
            vec![],
        );
        assert_eq!(catalog.get(ProblemId::new(1)).unwrap().title(), "First");
    }
}
