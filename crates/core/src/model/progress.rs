use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

use crate::model::ids::ProblemId;

//
// ─── EVENTS & NOTES ────────────────────────────────────────────────────────────
//

/// A single solve event.
///
/// History is append-only: unsolving a problem later does not remove its
/// entries. It records raw events, not current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveEntry {
    pub problem_id: ProblemId,
    pub solved_at: DateTime<Utc>,
    pub time_spent_min: u32,
}

/// Free-text note attached to a problem. Empty content is a valid note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Mutable per-installation progress state.
///
/// The record holds only raw state (solved set, bookmarks, notes, history,
/// time total); per-difficulty and per-topic counts are derived from the
/// solved set and the catalog on read, never stored here. The record itself
/// never consults the catalog, so ids the catalog does not know still enter
/// the solved set and the history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressRecord {
    solved: BTreeSet<ProblemId>,
    bookmarked: BTreeSet<ProblemId>,
    notes: BTreeMap<ProblemId, Note>,
    history: Vec<SolveEntry>,
    total_time_spent_min: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// A fresh, empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a record from persisted parts.
    #[must_use]
    pub fn from_parts(
        solved: BTreeSet<ProblemId>,
        bookmarked: BTreeSet<ProblemId>,
        notes: BTreeMap<ProblemId, Note>,
        history: Vec<SolveEntry>,
        total_time_spent_min: u64,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            solved,
            bookmarked,
            notes,
            history,
            total_time_spent_min,
            last_updated,
        }
    }

    /// Mark a problem solved, appending a history entry and adding to the
    /// time total.
    ///
    /// Returns `false` without any change when the problem is already solved.
    pub fn mark_solved(&mut self, id: ProblemId, time_spent_min: u32, now: DateTime<Utc>) -> bool {
        if !self.solved.insert(id) {
            return false;
        }
        self.history.push(SolveEntry {
            problem_id: id,
            solved_at: now,
            time_spent_min,
        });
        self.total_time_spent_min += u64::from(time_spent_min);
        true
    }

    /// Remove a problem from the solved set.
    ///
    /// History and the time total are intentionally untouched; they record
    /// what happened, not what is currently solved. Returns `false` when the
    /// problem was not solved.
    pub fn mark_unsolved(&mut self, id: ProblemId) -> bool {
        self.solved.remove(&id)
    }

    /// Flip bookmark membership; returns the new state.
    pub fn toggle_bookmark(&mut self, id: ProblemId) -> bool {
        if self.bookmarked.remove(&id) {
            false
        } else {
            self.bookmarked.insert(id);
            true
        }
    }

    /// Upsert the note for a problem. Empty text is stored, not treated as a
    /// deletion.
    pub fn set_note(&mut self, id: ProblemId, content: impl Into<String>, now: DateTime<Utc>) {
        self.notes.insert(
            id,
            Note {
                content: content.into(),
                updated_at: now,
            },
        );
    }

    /// Stamp the last-persisted-write timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_updated = Some(now);
    }

    // Accessors
    #[must_use]
    pub fn is_solved(&self, id: ProblemId) -> bool {
        self.solved.contains(&id)
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: ProblemId) -> bool {
        self.bookmarked.contains(&id)
    }

    #[must_use]
    pub fn solved(&self) -> &BTreeSet<ProblemId> {
        &self.solved
    }

    #[must_use]
    pub fn solved_count(&self) -> usize {
        self.solved.len()
    }

    #[must_use]
    pub fn bookmarked(&self) -> &BTreeSet<ProblemId> {
        &self.bookmarked
    }

    #[must_use]
    pub fn note(&self, id: ProblemId) -> Option<&Note> {
        self.notes.get(&id)
    }

    #[must_use]
    pub fn notes(&self) -> &BTreeMap<ProblemId, Note> {
        &self.notes
    }

    #[must_use]
    pub fn history(&self) -> &[SolveEntry] {
        &self.history
    }

    #[must_use]
    pub fn total_time_spent_min(&self) -> u64 {
        self.total_time_spent_min
    }

    #[must_use]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
