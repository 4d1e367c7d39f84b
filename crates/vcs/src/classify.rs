//! Partition a status report into changed sources and project definitions

use crate::status::StatusSource;
use crate::Result;
use ib_core::{base_name, ChangeSet, FileKind, FileKinds};
use tracing::{debug, info};

/// Classify the working tree changes reported by `source`
///
/// Only the base name, extension and modification flag are consulted.
/// Sources count when their status is anything but unmodified; project
/// definitions count whenever they appear in the report (new, deleted
/// and untracked included). Names without an extension are skipped.
pub fn classify_changes(source: &dyn StatusSource, kinds: &FileKinds) -> Result<ChangeSet> {
    let mut changes = ChangeSet::default();

    for entry in source.statuses()? {
        let Some(name) = base_name(&entry.path) else {
            continue;
        };

        match kinds.classify(&name) {
            Some(FileKind::Source) if entry.status.is_changed() => {
                debug!("Changed source: {} ({:?})", entry.path.display(), entry.status);
                changes.changed_sources.push(name);
            }
            Some(FileKind::ProjectDefinition) => {
                debug!("Changed project: {} ({:?})", entry.path.display(), entry.status);
                changes.changed_project_defs.push(name);
            }
            _ => {}
        }
    }

    info!(
        "Classified changes: {} sources, {} project definitions",
        changes.changed_sources.len(),
        changes.changed_project_defs.len()
    );

    Ok(changes)
}
