//! File classification by extension
//!
//! Identity of a changed file reduces to its base name: directory location
//! is discarded, so `a/util.cpp` and `b/util.cpp` are the same source
//! downstream.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of a classified file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Compilation unit referenced by projects
    Source,
    /// Project definition that references sources
    ProjectDefinition,
}

/// Extension markers used to classify files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileKinds {
    /// Source file extension, without the dot (default: `cpp`)
    pub source_extension: String,
    /// Project definition extension, without the dot (default: `cbproj`)
    pub project_extension: String,
}

impl Default for FileKinds {
    fn default() -> Self {
        Self {
            source_extension: "cpp".to_string(),
            project_extension: "cbproj".to_string(),
        }
    }
}

impl FileKinds {
    /// Create markers for the given extensions
    pub fn new(source_extension: impl Into<String>, project_extension: impl Into<String>) -> Self {
        Self {
            source_extension: source_extension.into(),
            project_extension: project_extension.into(),
        }
    }

    /// Classify a base name by its extension
    ///
    /// Names without an extension classify as `None`.
    pub fn classify(&self, name: &str) -> Option<FileKind> {
        let ext = extension_of(name)?;
        self.kind_of_extension(ext)
    }

    /// Classify a name found by the directory walk
    ///
    /// The walk only accepts names with exactly one dot (`stem.ext`);
    /// anything else is skipped.
    pub fn classify_walked(&self, name: &str) -> Option<FileKind> {
        let ext = walk_extension_of(name)?;
        self.kind_of_extension(ext)
    }

    fn kind_of_extension(&self, ext: &str) -> Option<FileKind> {
        if ext.eq_ignore_ascii_case(&self.source_extension) {
            Some(FileKind::Source)
        } else if ext.eq_ignore_ascii_case(&self.project_extension) {
            Some(FileKind::ProjectDefinition)
        } else {
            None
        }
    }
}

/// Extension of a base name, if any
///
/// Follows `Path::extension`: `main.cpp` -> `cpp`, `a.b.cpp` -> `cpp`,
/// `Makefile` and `.gitignore` -> `None`.
pub fn extension_of(name: &str) -> Option<&str> {
    Path::new(name).extension().and_then(|ext| ext.to_str())
}

/// Extension of a base name under the walk filter
///
/// Splitting on `.` must yield exactly two segments; zero or multiple
/// dots yield `None`.
pub fn walk_extension_of(name: &str) -> Option<&str> {
    let mut segments = name.split('.');
    let _stem = segments.next()?;
    let ext = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    Some(ext)
}

/// Base file name of a path as an owned string
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
