//! Derived statistics, streaks, and recommendations.
//!
//! Everything here is recomputed from the raw solved set, the solve history,
//! and the catalog on every call. Nothing is cached, so the aggregates can
//! never drift from the state they are derived from.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::model::{Difficulty, Importance, Problem, ProgressRecord, SolveEntry};

/// Aggregate progress view for the rendering layer.
///
/// `by_difficulty` always carries all three tiers (zero when nothing is
/// solved at that tier); `by_topic` only carries topics with at least one
/// solve. Solved ids the catalog does not know contribute to `solved_count`
/// but not to either breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub total_problems: usize,
    pub solved_count: usize,
    pub unsolved_count: usize,
    pub completion_percentage: f64,
    pub by_difficulty: BTreeMap<Difficulty, u32>,
    pub by_topic: BTreeMap<String, u32>,
    pub total_time_spent_min: u64,
}

/// Recompute the aggregate view from the solved set and the catalog.
#[must_use]
pub fn summarize(catalog: &Catalog, record: &ProgressRecord) -> ProgressSummary {
    let mut by_difficulty: BTreeMap<Difficulty, u32> =
        Difficulty::ALL.iter().map(|d| (*d, 0)).collect();
    let mut by_topic: BTreeMap<String, u32> = BTreeMap::new();

    for id in record.solved() {
        if let Some(problem) = catalog.get(*id) {
            *by_difficulty.entry(problem.difficulty()).or_insert(0) += 1;
            *by_topic.entry(problem.topic().to_owned()).or_insert(0) += 1;
        }
    }

    let total_problems = catalog.len();
    let solved_count = record.solved_count();
    let completion_percentage = if total_problems == 0 {
        0.0
    } else {
        solved_count as f64 / total_problems as f64 * 100.0
    };

    ProgressSummary {
        total_problems,
        solved_count,
        unsolved_count: total_problems.saturating_sub(solved_count),
        completion_percentage,
        by_difficulty,
        by_topic,
        total_time_spent_min: record.total_time_spent_min(),
    }
}

/// Unsolved high-importance problems, easiest first.
///
/// Ordering is by difficulty ascending, stable by catalog order within a
/// tier, truncated to `limit`. Empty when no unsolved high-importance
/// problems remain.
#[must_use]
pub fn recommend<'a>(
    catalog: &'a Catalog,
    record: &ProgressRecord,
    limit: usize,
) -> Vec<&'a Problem> {
    let mut picks: Vec<&Problem> = catalog
        .problems()
        .iter()
        .filter(|p| p.importance() == Importance::High && !record.is_solved(p.id()))
        .collect();
    picks.sort_by_key(|p| p.difficulty());
    picks.truncate(limit);
    picks
}

/// Consecutive-day solve streak as of `today`.
///
/// The streak is the length of the maximal run of consecutive calendar days
/// with at least one solve, ending at `today` — or ending at yesterday when
/// today has no solve yet, so an unfinished day does not break the chain.
/// Returns 0 when neither today nor yesterday has a solve.
#[must_use]
pub fn current_streak(history: &[SolveEntry], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = history.iter().map(|e| e.solved_at.date_naive()).collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 1;
    while let Some(previous) = cursor.pred_opt() {
        if !days.contains(&previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

/// Solves per calendar day, for time-over-time views.
#[must_use]
pub fn daily_solve_counts(history: &[SolveEntry]) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for entry in history {
        *counts.entry(entry.solved_at.date_naive()).or_insert(0) += 1;
    }
    counts
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
