use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use log::{debug, info, warn};

use practice_core::Clock;
use practice_core::catalog::Catalog;
use practice_core::model::{Problem, ProblemId, ProgressRecord, SolveEntry};
use practice_core::stats::{self, ProgressSummary};
use storage::repository::{ProgressDoc, ProgressRepository};

use crate::error::ProgressServiceError;
use crate::export;

/// A problem paired with its progress status, for listing views.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemStatus {
    pub problem: Problem,
    pub solved: bool,
    pub bookmarked: bool,
    pub has_note: bool,
}

/// Owns the progress record and every mutation path; the sole writer of
/// persisted state.
///
/// Each mutator updates the in-memory record, stamps `last_updated`, and
/// writes the whole document back through the repository. A failed write
/// propagates to the caller; it is never masked.
pub struct ProgressService {
    clock: Clock,
    catalog: Arc<Catalog>,
    repo: Arc<dyn ProgressRepository>,
    record: Mutex<ProgressRecord>,
}

impl ProgressService {
    /// Load the persisted record.
    ///
    /// A missing document yields a fresh record; an unreadable one is logged
    /// and also yields a fresh record — the prior data is lost, which is the
    /// documented degradation, not a hidden one.
    pub async fn load(
        clock: Clock,
        catalog: Arc<Catalog>,
        repo: Arc<dyn ProgressRepository>,
    ) -> Self {
        let record = match repo.load().await {
            Ok(Some(doc)) => doc.into_record(),
            Ok(None) => ProgressRecord::new(),
            Err(err) => {
                warn!("progress record unreadable, starting fresh: {err}");
                ProgressRecord::new()
            }
        };

        Self {
            clock,
            catalog,
            repo,
            record: Mutex::new(record),
        }
    }

    fn record(&self) -> MutexGuard<'_, ProgressRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn persist(&self, snapshot: &ProgressRecord) -> Result<(), ProgressServiceError> {
        let doc = ProgressDoc::from_record(snapshot, &self.catalog);
        self.repo.store(&doc).await?;
        Ok(())
    }

    /// Mark a problem solved.
    ///
    /// Idempotent: returns `Ok(false)` without touching storage when the
    /// problem is already solved. Ids the catalog does not know still enter
    /// the solved set and the history; they just never show up in the
    /// per-difficulty/topic breakdowns.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn mark_solved(
        &self,
        id: ProblemId,
        time_spent_min: u32,
    ) -> Result<bool, ProgressServiceError> {
        let now = self.clock.now();
        let snapshot = {
            let mut record = self.record();
            if !record.mark_solved(id, time_spent_min, now) {
                debug!("problem {id} already solved, skipping");
                return Ok(false);
            }
            record.touch(now);
            record.clone()
        };

        info!("marked problem {id} solved ({time_spent_min} min)");
        self.persist(&snapshot).await?;
        Ok(true)
    }

    /// Move a problem back to unsolved.
    ///
    /// Returns `Ok(false)` when it was not solved. Solve history and the
    /// time total are intentionally left as they were.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn mark_unsolved(&self, id: ProblemId) -> Result<bool, ProgressServiceError> {
        let now = self.clock.now();
        let snapshot = {
            let mut record = self.record();
            if !record.mark_unsolved(id) {
                debug!("problem {id} was not solved, skipping");
                return Ok(false);
            }
            record.touch(now);
            record.clone()
        };

        info!("marked problem {id} unsolved");
        self.persist(&snapshot).await?;
        Ok(true)
    }

    /// Flip the bookmark on a problem; returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn toggle_bookmark(&self, id: ProblemId) -> Result<bool, ProgressServiceError> {
        let now = self.clock.now();
        let (bookmarked, snapshot) = {
            let mut record = self.record();
            let bookmarked = record.toggle_bookmark(id);
            record.touch(now);
            (bookmarked, record.clone())
        };

        debug!("bookmark for problem {id} now {bookmarked}");
        self.persist(&snapshot).await?;
        Ok(bookmarked)
    }

    /// Upsert the note for a problem. Empty text is a valid note.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the write fails.
    pub async fn save_note(
        &self,
        id: ProblemId,
        text: impl Into<String>,
    ) -> Result<(), ProgressServiceError> {
        let now = self.clock.now();
        let snapshot = {
            let mut record = self.record();
            record.set_note(id, text, now);
            record.touch(now);
            record.clone()
        };

        debug!("saved note for problem {id}");
        self.persist(&snapshot).await
    }

    /// Note text for a problem, empty when none exists.
    #[must_use]
    pub fn note(&self, id: ProblemId) -> String {
        self.record()
            .note(id)
            .map(|note| note.content.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_solved(&self, id: ProblemId) -> bool {
        self.record().is_solved(id)
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: ProblemId) -> bool {
        self.record().is_bookmarked(id)
    }

    #[must_use]
    pub fn solved_ids(&self) -> Vec<ProblemId> {
        self.record().solved().iter().copied().collect()
    }

    /// Aggregate statistics, recomputed from the solved set and the catalog.
    #[must_use]
    pub fn stats(&self) -> ProgressSummary {
        stats::summarize(&self.catalog, &self.record())
    }

    /// Unsolved high-importance problems, easiest first, at most `limit`.
    #[must_use]
    pub fn recommend(&self, limit: usize) -> Vec<Problem> {
        let record = self.record();
        stats::recommend(&self.catalog, &record, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Consecutive-day solve streak as of the service clock's today.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        let today = self.clock.now().date_naive();
        stats::current_streak(self.record().history(), today)
    }

    /// Solves per calendar day, for time-over-time views.
    #[must_use]
    pub fn daily_solve_counts(&self) -> BTreeMap<NaiveDate, u32> {
        stats::daily_solve_counts(self.record().history())
    }

    #[must_use]
    pub fn solve_history(&self) -> Vec<SolveEntry> {
        self.record().history().to_vec()
    }

    /// Bookmarked problems resolved against the catalog; stale ids are
    /// silently dropped.
    #[must_use]
    pub fn bookmarked_problems(&self) -> Vec<Problem> {
        let record = self.record();
        record
            .bookmarked()
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .cloned()
            .collect()
    }

    /// Status view for each problem in the given learning path.
    #[must_use]
    pub fn path_statuses(&self, key: &str) -> Vec<ProblemStatus> {
        let record = self.record();
        self.catalog
            .path_problems(key)
            .into_iter()
            .map(|problem| Self::status_of(&record, problem))
            .collect()
    }

    /// Status view for an arbitrary problem list (search results, filters).
    #[must_use]
    pub fn statuses<'a>(&self, problems: impl IntoIterator<Item = &'a Problem>) -> Vec<ProblemStatus> {
        let record = self.record();
        problems
            .into_iter()
            .map(|problem| Self::status_of(&record, problem))
            .collect()
    }

    /// One CSV row per catalog problem with its solve status.
    #[must_use]
    pub fn export_csv(&self) -> String {
        export::progress_csv(&self.catalog, &self.record())
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn status_of(record: &ProgressRecord, problem: &Problem) -> ProblemStatus {
        let id = problem.id();
        ProblemStatus {
            problem: problem.clone(),
            solved: record.is_solved(id),
            bookmarked: record.is_bookmarked(id),
            has_note: record.note(id).is_some(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{Difficulty, Importance, ProblemDraft};
    use practice_core::time::{fixed_clock, fixed_now};
    use std::collections::BTreeMap;
    use storage::repository::InMemoryProgressStore;

    fn problem(id: u64, difficulty: Difficulty, topic: &str, importance: Importance) -> Problem {
        ProblemDraft::new(id, format!("Problem {id}"), difficulty, topic, importance)
            .validate()
            .unwrap()
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            vec![
                problem(1, Difficulty::Easy, "Array", Importance::High),
                problem(2, Difficulty::Hard, "Graph", Importance::High),
                problem(5, Difficulty::Medium, "DP", Importance::Low),
            ],
            BTreeMap::new(),
            vec![],
            vec![],
        ))
    }

    async fn service() -> (ProgressService, InMemoryProgressStore) {
        let store = InMemoryProgressStore::new();
        let service =
            ProgressService::load(fixed_clock(), catalog(), Arc::new(store.clone())).await;
        (service, store)
    }

    #[tokio::test]
    async fn mark_solved_updates_stats_and_persists() {
        let (service, store) = service().await;

        assert!(service.mark_solved(ProblemId::new(5), 30).await.unwrap());

        let summary = service.stats();
        assert_eq!(summary.solved_count, 1);
        assert_eq!(summary.by_difficulty[&Difficulty::Medium], 1);
        assert_eq!(summary.by_topic["DP"], 1);
        assert_eq!(summary.total_time_spent_min, 30);

        let doc = store.snapshot().expect("a write happened");
        assert_eq!(doc.solved_problems, vec![5]);
        assert_eq!(doc.difficulty_stats["Medium"], 1);
        assert_eq!(doc.last_updated, Some(fixed_now()));
    }

    #[tokio::test]
    async fn second_mark_solved_is_a_noop() {
        let (service, store) = service().await;

        service.mark_solved(ProblemId::new(1), 10).await.unwrap();
        assert!(!service.mark_solved(ProblemId::new(1), 99).await.unwrap());

        assert_eq!(service.stats().total_time_spent_min, 10);
        assert_eq!(store.snapshot().unwrap().solve_history.len(), 1);
    }

    #[tokio::test]
    async fn unsolve_restores_membership_but_not_history() {
        let (service, _store) = service().await;

        service.mark_solved(ProblemId::new(1), 25).await.unwrap();
        assert!(service.mark_unsolved(ProblemId::new(1)).await.unwrap());

        assert!(!service.is_solved(ProblemId::new(1)));
        assert_eq!(service.stats().by_difficulty[&Difficulty::Easy], 0);
        assert_eq!(service.stats().total_time_spent_min, 25);
        assert_eq!(service.solve_history().len(), 1);
    }

    #[tokio::test]
    async fn unknown_id_still_enters_solved_and_history() {
        let (service, _store) = service().await;

        assert!(service.mark_solved(ProblemId::new(999), 5).await.unwrap());

        let summary = service.stats();
        assert_eq!(summary.solved_count, 1);
        assert_eq!(summary.by_difficulty[&Difficulty::Easy], 0);
        assert!(summary.by_topic.is_empty());
        assert_eq!(service.solve_history().len(), 1);
        assert_eq!(summary.total_time_spent_min, 5);
    }

    #[tokio::test]
    async fn bookmark_toggle_roundtrip() {
        let (service, _store) = service().await;
        let id = ProblemId::new(2);

        assert!(service.toggle_bookmark(id).await.unwrap());
        assert!(service.is_bookmarked(id));
        assert!(!service.toggle_bookmark(id).await.unwrap());
        assert!(!service.is_bookmarked(id));
    }

    #[tokio::test]
    async fn stale_bookmarks_are_filtered_from_listing() {
        let (service, _store) = service().await;

        service.toggle_bookmark(ProblemId::new(2)).await.unwrap();
        service.toggle_bookmark(ProblemId::new(777)).await.unwrap();

        let listed: Vec<u64> = service
            .bookmarked_problems()
            .iter()
            .map(|p| p.id().value())
            .collect();
        assert_eq!(listed, vec![2]);
    }

    #[tokio::test]
    async fn note_roundtrip_and_default() {
        let (service, _store) = service().await;
        let id = ProblemId::new(1);

        assert_eq!(service.note(id), "");
        service.save_note(id, "two pointers").await.unwrap();
        assert_eq!(service.note(id), "two pointers");
        service.save_note(id, "").await.unwrap();
        assert_eq!(service.note(id), "");
    }

    #[tokio::test]
    async fn recommend_example_from_catalog() {
        let (service, _store) = service().await;

        let picks: Vec<u64> = service.recommend(10).iter().map(|p| p.id().value()).collect();
        assert_eq!(picks, vec![1, 2]);

        service.mark_solved(ProblemId::new(1), 0).await.unwrap();
        let picks: Vec<u64> = service.recommend(10).iter().map(|p| p.id().value()).collect();
        assert_eq!(picks, vec![2]);
    }

    #[tokio::test]
    async fn streak_counts_consecutive_days() {
        let store = InMemoryProgressStore::new();
        let mut clock = fixed_clock();
        clock.advance(chrono::Duration::days(-1));
        let yesterday_service =
            ProgressService::load(clock, catalog(), Arc::new(store.clone())).await;
        yesterday_service
            .mark_solved(ProblemId::new(1), 10)
            .await
            .unwrap();

        let today_service =
            ProgressService::load(fixed_clock(), catalog(), Arc::new(store.clone())).await;
        assert_eq!(today_service.current_streak(), 1);

        today_service.mark_solved(ProblemId::new(2), 10).await.unwrap();
        assert_eq!(today_service.current_streak(), 2);
    }

    #[tokio::test]
    async fn statuses_reflect_record_state() {
        let (service, _store) = service().await;
        service.mark_solved(ProblemId::new(1), 5).await.unwrap();
        service.save_note(ProblemId::new(2), "revisit").await.unwrap();

        let statuses = service.statuses(service.catalog().problems());
        assert_eq!(statuses.len(), 3);
        assert!(statuses[0].solved);
        assert!(!statuses[0].has_note);
        assert!(statuses[1].has_note);
        assert!(!statuses[1].solved);
    }

    #[tokio::test]
    async fn loads_prior_state_from_repository() {
        let store = InMemoryProgressStore::new();
        {
            let service =
                ProgressService::load(fixed_clock(), catalog(), Arc::new(store.clone())).await;
            service.mark_solved(ProblemId::new(1), 15).await.unwrap();
            service.toggle_bookmark(ProblemId::new(2)).await.unwrap();
        }

        let reloaded =
            ProgressService::load(fixed_clock(), catalog(), Arc::new(store.clone())).await;
        assert!(reloaded.is_solved(ProblemId::new(1)));
        assert!(reloaded.is_bookmarked(ProblemId::new(2)));
        assert_eq!(reloaded.stats().total_time_spent_min, 15);
    }
}
