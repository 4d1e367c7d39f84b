//! Concurrent dependency scan across project definitions
//!
//! One blocking task per project. All tasks write into a single
//! lock-guarded map owned by this scan; each task performs its
//! read-append-write inside one critical section.

use crate::discover::discover;
use crate::{Result, ScanError};
use ib_core::{DependencyMap, SourceName};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Scan tuning
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Upper bound on concurrently running discovery tasks
    ///
    /// `None` (or zero) means one task per project with no bound.
    pub max_concurrency: Option<usize>,
}

impl ScanOptions {
    /// Options with an explicit concurrency bound (0 = unbounded)
    pub fn with_concurrency(max: usize) -> Self {
        Self {
            max_concurrency: (max > 0).then_some(max),
        }
    }
}

/// Scan every project against `candidates` and build a fresh map
///
/// The result holds an entry for every project, empty when nothing
/// matched. Waits for all tasks before returning; if any project could
/// not be read, the first such error is returned and the map discarded.
pub async fn scan_projects(
    projects: Vec<PathBuf>,
    candidates: Vec<SourceName>,
    options: &ScanOptions,
) -> Result<DependencyMap> {
    let project_count = projects.len();
    let shared = Arc::new(Mutex::new(DependencyMap::new()));
    let candidates: Arc<[SourceName]> = candidates.into();
    let limiter = options
        .max_concurrency
        .filter(|max| *max > 0)
        .map(|max| Arc::new(Semaphore::new(max)));

    info!(
        "Scanning {} projects against {} candidates",
        project_count,
        candidates.len()
    );

    let mut tasks = JoinSet::new();
    for project in projects {
        let permit = match limiter {
            Some(ref semaphore) => Arc::clone(semaphore).acquire_owned().await.ok(),
            None => None,
        };
        let shared = Arc::clone(&shared);
        let candidates = Arc::clone(&candidates);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let found = discover(&project, &candidates)?;
            debug!("{}: {} references", project.display(), found.len());

            let mut map = shared.lock();
            map.ensure_project(&project);
            for name in found {
                map.insert_reference(&project, name);
            }
            Ok::<_, ScanError>(())
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.map_err(ScanError::from).and_then(|scanned| scanned);
        if let Err(e) = outcome {
            first_error.get_or_insert(e);
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    let map = match Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner(),
        Err(shared) => shared.lock().clone(),
    };

    info!(
        "Scan complete: {} projects, {} references",
        map.len(),
        map.reference_count()
    );

    Ok(map)
}
