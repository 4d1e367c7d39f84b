//! Working tree status via libgit2

use crate::{Result, VcsError};
use git2::{Repository, Status, StatusOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Modification status of a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// Identical to HEAD
    Unmodified,
    /// Modified in the working tree
    Modified,
    /// Added or modified in the index only
    Staged,
    /// Not tracked yet
    Untracked,
    /// Removed from the working tree or the index
    Deleted,
    /// Renamed
    Renamed,
    /// File type changed (e.g. file -> symlink)
    TypeChange,
    /// Merge conflict
    Conflicted,
}

impl ChangeStatus {
    /// Whether the path differs from HEAD in any way
    pub fn is_changed(self) -> bool {
        self != ChangeStatus::Unmodified
    }

    /// Collapse libgit2 status flags into a single status
    ///
    /// Working tree flags win over index flags, so a file that is staged
    /// and then edited again reports as `Modified`.
    pub fn from_git(status: Status) -> Self {
        if status.is_conflicted() {
            ChangeStatus::Conflicted
        } else if status.is_wt_deleted() || status.is_index_deleted() {
            ChangeStatus::Deleted
        } else if status.is_wt_renamed() || status.is_index_renamed() {
            ChangeStatus::Renamed
        } else if status.is_wt_typechange() || status.is_index_typechange() {
            ChangeStatus::TypeChange
        } else if status.is_wt_new() {
            ChangeStatus::Untracked
        } else if status.is_wt_modified() {
            ChangeStatus::Modified
        } else if status.is_index_new() || status.is_index_modified() {
            ChangeStatus::Staged
        } else {
            ChangeStatus::Unmodified
        }
    }
}

/// One line of a status report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to the working tree root
    pub path: PathBuf,
    /// Modification status
    pub status: ChangeStatus,
}

impl StatusEntry {
    /// Create a new status entry
    pub fn new(path: impl Into<PathBuf>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// Anything that can report per-path working tree status
pub trait StatusSource {
    /// Every path with a non-clean status
    fn statuses(&self) -> Result<Vec<StatusEntry>>;
}

/// Git working tree status
pub struct GitStatusSource {
    repo: Repository,
}

impl GitStatusSource {
    /// Open the repository whose working tree is at `path`
    ///
    /// `path` must be the working tree root itself; parent directories are
    /// not searched.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|source| VcsError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }
}

impl StatusSource for GitStatusSource {
    fn statuses(&self) -> Result<Vec<StatusEntry>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut entries = Vec::with_capacity(statuses.len());

        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                debug!("Skipping status entry with non-UTF-8 path");
                continue;
            };
            entries.push(StatusEntry::new(path, ChangeStatus::from_git(entry.status())));
        }

        debug!("Status report: {} entries", entries.len());
        Ok(entries)
    }
}
