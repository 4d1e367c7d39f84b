//! Project discovery and dependency scanning
//!
//! This crate provides:
//! - A recursive walk that inventories project definitions and sources
//! - Per-project textual discovery of referenced source names
//! - A concurrent scan (one task per project) into a shared map

pub mod discover;
pub mod scan;
pub mod walk;

pub use discover::discover;
pub use scan::{scan_projects, ScanOptions};
pub use walk::{walk_tree, SkipRules, TreeInventory};

use std::path::PathBuf;
use thiserror::Error;

/// Errors from walking or scanning the tree
///
/// Every variant is fatal for the run: a project that cannot be read
/// would silently drop out of future staleness checks.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A project definition could not be opened
    #[error("failed to open project file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A project definition could not be read to the end
    #[error("failed to read project file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory walk could not complete
    #[error("failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A configured skip pattern does not parse
    #[error("invalid skip pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// A discovery task panicked or was cancelled
    #[error("discovery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;
