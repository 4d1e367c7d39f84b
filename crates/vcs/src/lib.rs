//! Version control integration for change classification
//!
//! This crate provides:
//! - `StatusSource`: per-path modification status of a working tree
//! - `GitStatusSource`: the git-backed implementation (libgit2)
//! - `classify_changes`: partition of the status report into changed
//!   sources and changed project definitions

pub mod classify;
pub mod status;

pub use classify::classify_changes;
pub use status::{ChangeStatus, GitStatusSource, StatusEntry, StatusSource};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from querying version control
///
/// All of these are fatal for a run: classification is a prerequisite for
/// everything downstream.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The path is not an openable working tree
    #[error("failed to open repository at {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    /// The status query itself failed
    #[error("failed to query working tree status: {0}")]
    Status(#[from] git2::Error),
}

/// Result type for version control operations
pub type Result<T> = std::result::Result<T, VcsError>;
