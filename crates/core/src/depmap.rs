//! Project -> source dependency map and the dirty project set

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};

/// Base name of a source file (directory-independent identity)
pub type SourceName = String;

/// Persisted mapping from project definition path to referenced sources
///
/// Set-valued: inserting the same source twice for a project is a no-op,
/// so concurrent writers reporting duplicates are harmless. Iteration
/// order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyMap {
    projects: BTreeMap<PathBuf, BTreeSet<SourceName>>,
}

impl DependencyMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a project has an entry, even with no references
    pub fn ensure_project(&mut self, project: &Path) {
        self.projects.entry(project.to_path_buf()).or_default();
    }

    /// Record that `project` references `source`
    pub fn insert_reference(&mut self, project: &Path, source: impl Into<SourceName>) {
        self.projects
            .entry(project.to_path_buf())
            .or_default()
            .insert(source.into());
    }

    /// Sources referenced by a project
    pub fn get(&self, project: &Path) -> Option<&BTreeSet<SourceName>> {
        self.projects.get(project)
    }

    /// Whether a project has an entry
    pub fn contains_project(&self, project: &Path) -> bool {
        self.projects.contains_key(project)
    }

    /// Iterate over (project, sources) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &BTreeSet<SourceName>)> {
        self.projects.iter().map(|(p, s)| (p.as_path(), s))
    }

    /// Number of projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether the map has no projects
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Total number of recorded references across all projects
    pub fn reference_count(&self) -> usize {
        self.projects.values().map(BTreeSet::len).sum()
    }

    /// Select every project whose references intersect `changed`
    ///
    /// Projects with no references are never selected.
    pub fn dirty_for(&self, changed: &[SourceName]) -> DirtyProjectSet {
        let changed: HashSet<&str> = changed.iter().map(String::as_str).collect();
        let mut dirty = DirtyProjectSet::default();

        for (project, sources) in &self.projects {
            let triggers: Vec<SourceName> = sources
                .iter()
                .filter(|name| changed.contains(name.as_str()))
                .cloned()
                .collect();

            if !triggers.is_empty() {
                dirty.insert(project.clone(), triggers);
            }
        }

        dirty
    }
}

impl FromIterator<(PathBuf, BTreeSet<SourceName>)> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = (PathBuf, BTreeSet<SourceName>)>>(iter: I) -> Self {
        Self {
            projects: iter.into_iter().collect(),
        }
    }
}

/// Projects selected for building, with the sources that triggered them
///
/// Ephemeral: handed to the build executor and discarded after the run.
/// Consumers must not depend on iteration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyProjectSet {
    projects: BTreeMap<PathBuf, Vec<SourceName>>,
}

impl DirtyProjectSet {
    /// Mark a project dirty because of `triggers`
    pub fn insert(&mut self, project: PathBuf, triggers: Vec<SourceName>) {
        self.projects.insert(project, triggers);
    }

    /// Triggering sources for a project
    pub fn get(&self, project: &Path) -> Option<&[SourceName]> {
        self.projects.get(project).map(Vec::as_slice)
    }

    /// Iterate over (project, triggers) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[SourceName])> {
        self.projects.iter().map(|(p, s)| (p.as_path(), s.as_slice()))
    }

    /// Number of dirty projects
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether nothing needs building
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
