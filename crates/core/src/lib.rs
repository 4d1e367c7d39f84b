//! intellibuild core - shared types for incremental build selection
//!
//! This crate provides the vocabulary the other crates speak:
//! - File classification by extension (source vs project definition)
//! - The per-run change set reported by version control
//! - The persisted project -> source dependency map
//! - The dirty project set handed to the build executor

pub mod change;
pub mod classify;
pub mod depmap;

// Re-export main types for convenience
pub use change::ChangeSet;
pub use classify::{base_name, extension_of, walk_extension_of, FileKind, FileKinds};
pub use depmap::{DependencyMap, DirtyProjectSet, SourceName};
