//! Build selection: trust the cache or rebuild it, then pick dirty projects
//!
//! Decided once per run:
//! - Rebuild when a project definition changed, when there is no usable
//!   cache, or when the caller forces it. Every project under the root is
//!   re-scanned and the map is replaced wholesale.
//! - Otherwise intersect the cached map with the changed sources. No file
//!   content is read.

use cache::{CandidateScope, Settings};
use ib_core::{ChangeSet, DependencyMap, DirtyProjectSet, FileKinds, SourceName};
use scanner::{scan_projects, walk_tree, ScanError, ScanOptions, SkipRules};
use std::path::{Path, PathBuf};
use tracing::info;

/// Why the dependency map is being rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildReason {
    /// At least one project definition changed
    ProjectsChanged,
    /// The cache was missing or unparsable
    NoCache,
    /// Requested explicitly
    Forced,
}

/// Which branch the selector took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Full walk and scan, map replaced
    Rebuild(RebuildReason),
    /// Cached map intersected with changed sources
    Incremental,
}

impl Branch {
    /// Short human-readable description
    pub fn describe(&self) -> &'static str {
        match self {
            Branch::Rebuild(RebuildReason::ProjectsChanged) => "rebuild (project definitions changed)",
            Branch::Rebuild(RebuildReason::NoCache) => "rebuild (no usable cache)",
            Branch::Rebuild(RebuildReason::Forced) => "rebuild (forced)",
            Branch::Incremental => "incremental (cached dependencies)",
        }
    }
}

/// Outcome of one selection
#[derive(Debug, Clone)]
pub struct Selection {
    /// Branch taken
    pub branch: Branch,
    /// Map to persist for the next run
    pub dependency_map: DependencyMap,
    /// Projects to build, with their triggering sources
    pub dirty: DirtyProjectSet,
}

/// Chooses the branch and computes the dirty project set
pub struct BuildSelector {
    root: PathBuf,
    kinds: FileKinds,
    skip_patterns: Vec<String>,
    scope: CandidateScope,
    scan: ScanOptions,
    force_rebuild: bool,
}

impl BuildSelector {
    /// Create a selector for an absolute repository root
    pub fn new(root: &Path, settings: &Settings) -> Self {
        Self {
            root: root.to_path_buf(),
            kinds: settings.file_kinds(),
            skip_patterns: settings.skip_patterns.clone(),
            scope: settings.candidate_scope.clone(),
            scan: ScanOptions::with_concurrency(settings.scan_concurrency),
            force_rebuild: false,
        }
    }

    /// Always take the rebuild branch
    pub fn force_rebuild(mut self, force: bool) -> Self {
        self.force_rebuild = force;
        self
    }

    /// Decide the branch without doing any work
    pub fn choose_branch(&self, changes: &ChangeSet, cached: Option<&DependencyMap>) -> Branch {
        if changes.has_project_changes() {
            Branch::Rebuild(RebuildReason::ProjectsChanged)
        } else if cached.is_none() {
            Branch::Rebuild(RebuildReason::NoCache)
        } else if self.force_rebuild {
            Branch::Rebuild(RebuildReason::Forced)
        } else {
            Branch::Incremental
        }
    }

    /// Run selection for this run's changes
    ///
    /// `cached` is `None` when the cache failed to load.
    pub async fn select(
        &self,
        changes: &ChangeSet,
        cached: Option<DependencyMap>,
    ) -> Result<Selection, ScanError> {
        let branch = self.choose_branch(changes, cached.as_ref());
        info!("Selection branch: {}", branch.describe());

        let dependency_map = match (branch, cached) {
            (Branch::Incremental, Some(map)) => map,
            _ => self.rebuild_map(changes).await?,
        };

        let dirty = dependency_map.dirty_for(&changes.changed_sources);
        info!("{} projects need building", dirty.len());

        Ok(Selection {
            branch,
            dependency_map,
            dirty,
        })
    }

    /// Walk the whole tree and scan every project definition found
    async fn rebuild_map(&self, changes: &ChangeSet) -> Result<DependencyMap, ScanError> {
        let rules = SkipRules::new(&self.root, &self.skip_patterns)?;
        let inventory = walk_tree(&rules, &self.kinds)?;

        let candidates = self.candidates(changes, inventory.sources);
        scan_projects(inventory.projects, candidates, &self.scan).await
    }

    fn candidates(&self, changes: &ChangeSet, tree_sources: Vec<SourceName>) -> Vec<SourceName> {
        let mut candidates = changes.changed_sources.clone();
        if self.scope == CandidateScope::AllSources {
            // Deleted sources are gone from the tree but may still be referenced
            candidates.extend(tree_sources);
        }
        candidates.sort();
        candidates.dedup();
        candidates
    }
}
