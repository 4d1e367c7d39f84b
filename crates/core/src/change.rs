//! Change set reported by version control for one run

use crate::depmap::SourceName;

/// Files that changed in the working tree, reduced to base names
///
/// Lives for a single run only; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    /// Changed source files (status other than unmodified)
    pub changed_sources: Vec<SourceName>,
    /// Project definitions present in the status report in any state
    pub changed_project_defs: Vec<String>,
}

impl ChangeSet {
    /// Create a change set from already-classified names
    pub fn new(changed_sources: Vec<SourceName>, changed_project_defs: Vec<String>) -> Self {
        Self {
            changed_sources,
            changed_project_defs,
        }
    }

    /// Whether any project definition changed
    ///
    /// A single changed project file invalidates the whole cache.
    pub fn has_project_changes(&self) -> bool {
        !self.changed_project_defs.is_empty()
    }

    /// Whether nothing relevant changed at all
    pub fn is_empty(&self) -> bool {
        self.changed_sources.is_empty() && self.changed_project_defs.is_empty()
    }
}
