use std::path::Path;
use std::sync::Arc;

use practice_core::Clock;
use practice_core::catalog::Catalog;
use storage::json::{JsonProgressStore, load_catalog_or_empty};
use storage::repository::ProgressRepository;

use crate::progress_service::ProgressService;

/// Assembles the core against file-backed storage.
///
/// This is the injection point for the rendering layer: construct once at
/// startup and pass it down. There is no ambient global to reach for.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services from the catalog source and progress document paths.
    ///
    /// Both load paths degrade instead of failing: a missing or malformed
    /// catalog source yields an empty catalog, and a missing or corrupt
    /// progress document yields a fresh record.
    pub async fn load(catalog_path: &Path, progress_path: &Path, clock: Clock) -> Self {
        let catalog = Arc::new(load_catalog_or_empty(catalog_path));
        let repo: Arc<dyn ProgressRepository> = Arc::new(JsonProgressStore::new(progress_path));
        let progress =
            Arc::new(ProgressService::load(clock, Arc::clone(&catalog), repo).await);

        Self { catalog, progress }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
