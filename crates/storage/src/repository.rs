use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use practice_core::catalog::Catalog;
use practice_core::model::{Note, ProblemId, ProgressRecord, SolveEntry};
use practice_core::stats;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Persisted shape of a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDoc {
    pub content: String,
    pub last_updated: DateTime<Utc>,
}

/// Persisted shape of one solve event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveEntryDoc {
    pub problem_id: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub time_spent: u32,
}

/// Persisted shape of the progress record.
///
/// Field names match the on-disk document. `difficulty_stats` and
/// `topic_stats` are write-only projections recomputed from the solved set
/// at save time; loading ignores them and rebuilds the record from the raw
/// sets, so the persisted counts can never drift from the data they
/// summarize. Notes are keyed by the problem id rendered as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressDoc {
    pub solved_problems: Vec<u64>,
    pub bookmarked_problems: Vec<u64>,
    pub notes: BTreeMap<String, NoteDoc>,
    pub difficulty_stats: BTreeMap<String, u32>,
    pub topic_stats: BTreeMap<String, u32>,
    pub last_updated: Option<DateTime<Utc>>,
    pub total_time_spent: u64,
    pub solve_history: Vec<SolveEntryDoc>,
}

impl ProgressDoc {
    /// Snapshot a domain record into its persisted shape, recomputing the
    /// stat projections against the catalog.
    #[must_use]
    pub fn from_record(record: &ProgressRecord, catalog: &Catalog) -> Self {
        let summary = stats::summarize(catalog, record);

        Self {
            solved_problems: record.solved().iter().map(|id| id.value()).collect(),
            bookmarked_problems: record.bookmarked().iter().map(|id| id.value()).collect(),
            notes: record
                .notes()
                .iter()
                .map(|(id, note)| {
                    (
                        id.to_string(),
                        NoteDoc {
                            content: note.content.clone(),
                            last_updated: note.updated_at,
                        },
                    )
                })
                .collect(),
            difficulty_stats: summary
                .by_difficulty
                .iter()
                .map(|(d, n)| (d.as_str().to_owned(), *n))
                .collect(),
            topic_stats: summary.by_topic.clone(),
            last_updated: record.last_updated(),
            total_time_spent: record.total_time_spent_min(),
            solve_history: record
                .history()
                .iter()
                .map(|entry| SolveEntryDoc {
                    problem_id: entry.problem_id.value(),
                    timestamp: entry.solved_at,
                    time_spent: entry.time_spent_min,
                })
                .collect(),
        }
    }

    /// Rebuild the domain record from the raw persisted sets.
    ///
    /// Note keys that do not parse as problem ids are dropped.
    #[must_use]
    pub fn into_record(self) -> ProgressRecord {
        let solved: BTreeSet<ProblemId> =
            self.solved_problems.into_iter().map(ProblemId::new).collect();
        let bookmarked: BTreeSet<ProblemId> = self
            .bookmarked_problems
            .into_iter()
            .map(ProblemId::new)
            .collect();
        let notes: BTreeMap<ProblemId, Note> = self
            .notes
            .into_iter()
            .filter_map(|(key, doc)| {
                let id: ProblemId = key.parse().ok()?;
                Some((
                    id,
                    Note {
                        content: doc.content,
                        updated_at: doc.last_updated,
                    },
                ))
            })
            .collect();
        let history: Vec<SolveEntry> = self
            .solve_history
            .into_iter()
            .map(|doc| SolveEntry {
                problem_id: ProblemId::new(doc.problem_id),
                solved_at: doc.timestamp,
                time_spent_min: doc.time_spent,
            })
            .collect();

        ProgressRecord::from_parts(
            solved,
            bookmarked,
            notes,
            history,
            self.total_time_spent,
            self.last_updated,
        )
    }
}

/// Repository contract for the persisted progress document.
///
/// Implementations perform whole-document reads and writes; there is no
/// partial update. The system assumes a single active session, so the last
/// write wins.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load the persisted document, `None` when no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when a document exists but cannot be read.
    async fn load(&self) -> Result<Option<ProgressDoc>, StorageError>;

    /// Persist the full document, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn store(&self, doc: &ProgressDoc) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryProgressStore {
    doc: Arc<Mutex<Option<ProgressDoc>>>,
}

impl InMemoryProgressStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently stored document, for assertions in tests.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Option<ProgressDoc> {
        self.doc.lock().expect("in-memory store lock").clone()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryProgressStore {
    async fn load(&self) -> Result<Option<ProgressDoc>, StorageError> {
        let guard = self
            .doc
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn store(&self, doc: &ProgressDoc) -> Result<(), StorageError> {
        let mut guard = self
            .doc
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(doc.clone());
        Ok(())
    }
}
