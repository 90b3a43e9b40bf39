//! JSON document adapters: the catalog configuration source and the
//! file-backed progress store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::warn;
use serde::Deserialize;

use practice_core::catalog::Catalog;
use practice_core::model::{Difficulty, Importance, LearningPath, ProblemDraft, ProblemId};

use crate::repository::{ProgressDoc, ProgressRepository, StorageError};

//
// ─── CATALOG SOURCE ────────────────────────────────────────────────────────────
//

/// On-disk schema of one catalog problem.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemDoc {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub link: String,
    pub difficulty: Difficulty,
    pub topic: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    pub importance: Importance,
    #[serde(default)]
    pub time_complexity: Option<String>,
    #[serde(default)]
    pub space_complexity: Option<String>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(default)]
    pub related_problems: Vec<u64>,
}

impl ProblemDoc {
    fn into_draft(self) -> ProblemDraft {
        ProblemDraft {
            id: self.id,
            title: self.title,
            link: self.link,
            difficulty: self.difficulty,
            topic: self.topic,
            patterns: self.patterns,
            companies: self.companies,
            importance: self.importance,
            time_complexity: self.time_complexity,
            space_complexity: self.space_complexity,
            hints: self.hints,
            related: self.related_problems,
        }
    }
}

/// On-disk schema of one learning path.
#[derive(Debug, Clone, Deserialize)]
pub struct PathDoc {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub problem_ids: Vec<u64>,
}

/// On-disk schema of the catalog configuration source.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogDoc {
    pub problems: Vec<ProblemDoc>,
    pub learning_paths: BTreeMap<String, PathDoc>,
    pub topics: Vec<String>,
    pub patterns: Vec<String>,
}

impl CatalogDoc {
    /// Convert the parsed document into a `Catalog`.
    ///
    /// Problems and paths that fail domain validation are skipped with a
    /// warning rather than failing the whole catalog.
    #[must_use]
    pub fn into_catalog(self) -> Catalog {
        let mut problems = Vec::with_capacity(self.problems.len());
        for doc in self.problems {
            let id = doc.id;
            match doc.into_draft().validate() {
                Ok(problem) => problems.push(problem),
                Err(err) => warn!("skipping catalog problem {id}: {err}"),
            }
        }

        let mut paths = BTreeMap::new();
        for (key, doc) in self.learning_paths {
            let ids = doc.problem_ids.into_iter().map(ProblemId::new).collect();
            match LearningPath::new(doc.name, doc.description, ids) {
                Ok(path) => {
                    paths.insert(key, path);
                }
                Err(err) => warn!("skipping learning path {key}: {err}"),
            }
        }

        Catalog::new(problems, paths, self.topics, self.patterns)
    }
}

/// Load the catalog from a JSON configuration file.
///
/// # Errors
///
/// Returns `StorageError` when the file cannot be read or parsed.
pub fn load_catalog(path: &Path) -> Result<Catalog, StorageError> {
    let raw = fs::read_to_string(path).map_err(|e| StorageError::Io(e.to_string()))?;
    let doc: CatalogDoc =
        serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
    Ok(doc.into_catalog())
}

/// Load the catalog, degrading to `Catalog::empty()` when the source is
/// missing or malformed.
#[must_use]
pub fn load_catalog_or_empty(path: &Path) -> Catalog {
    match load_catalog(path) {
        Ok(catalog) => catalog,
        Err(err) => {
            warn!(
                "catalog source {} unusable, starting with an empty catalog: {err}",
                path.display()
            );
            Catalog::empty()
        }
    }
}

//
// ─── PROGRESS STORE ────────────────────────────────────────────────────────────
//

/// File-backed progress store.
///
/// Every save writes the whole document: serialize, write to a sibling temp
/// file, rename over the target, so readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct JsonProgressStore {
    path: PathBuf,
}

impl JsonProgressStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, payload: &str) -> Result<(), StorageError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, payload).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::Io(e.to_string()))
    }
}

#[async_trait]
impl ProgressRepository for JsonProgressStore {
    async fn load(&self) -> Result<Option<ProgressDoc>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };
        let doc: ProgressDoc =
            serde_json::from_str(&raw).map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(doc))
    }

    async fn store(&self, doc: &ProgressDoc) -> Result<(), StorageError> {
        let payload = serde_json::to_string_pretty(doc)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write_atomic(&payload)
    }
}
