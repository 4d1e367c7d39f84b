//! Recursive inventory of project definitions and sources
//!
//! Skips version control metadata unconditionally and any directories or
//! files matching configured gitignore-style patterns. Everything else is
//! visited: a project left out of the walk would never be rebuilt.

use crate::{Result, ScanError};
use ib_core::{base_name, FileKind, FileKinds, SourceName};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory names that are never descended into
const BUILTIN_SKIPPED_DIRS: &[&str] = &[".git", ".jj", ".hg", ".svn"];

/// Walk skip rules
///
/// Combines:
/// 1. Built-in version control directories (always enforced)
/// 2. Additional gitignore-style patterns from settings
pub struct SkipRules {
    /// Repository root the patterns are relative to
    repo_root: PathBuf,

    /// Compiled additional patterns (None when there are none)
    patterns: Option<Gitignore>,
}

impl SkipRules {
    /// Compile skip rules for `repo_root`
    pub fn new(repo_root: &Path, patterns: &[String]) -> Result<Self> {
        let compiled = if patterns.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(repo_root);
            for pattern in patterns {
                builder
                    .add_line(None, pattern)
                    .map_err(|source| ScanError::Pattern {
                        pattern: pattern.clone(),
                        source,
                    })?;
            }
            let gitignore = builder.build().map_err(|source| ScanError::Pattern {
                pattern: patterns.join(", "),
                source,
            })?;
            Some(gitignore)
        };

        Ok(Self {
            repo_root: repo_root.to_path_buf(),
            patterns: compiled,
        })
    }

    /// Built-in rules only
    pub fn builtin(repo_root: &Path) -> Self {
        Self {
            repo_root: repo_root.to_path_buf(),
            patterns: None,
        }
    }

    /// Check if a path should be skipped by the walk
    pub fn should_skip(&self, path: &Path, is_dir: bool) -> bool {
        if is_dir {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if BUILTIN_SKIPPED_DIRS.contains(&name) {
                    return true;
                }
            }
        }

        if let Some(ref patterns) = self.patterns {
            let rel = path.strip_prefix(&self.repo_root).unwrap_or(path);
            if patterns.matched(rel, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }

    /// Get repository root
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

/// Result of walking the tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeInventory {
    /// Every project definition file (paths as yielded under the root)
    pub projects: Vec<PathBuf>,
    /// Base names of every source file
    pub sources: Vec<SourceName>,
}

/// Walk `rules.repo_root()` and collect project definitions and sources
///
/// Only base names with exactly one dot are considered (`App.cbproj`
/// yes, `App.old.cbproj` and `Makefile` no). Any walk error aborts.
pub fn walk_tree(rules: &SkipRules, kinds: &FileKinds) -> Result<TreeInventory> {
    let root = rules.repo_root();
    let mut inventory = TreeInventory::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !rules.should_skip(e.path(), e.file_type().is_dir()));

    for entry in walker {
        let entry = entry.map_err(|source| ScanError::Walk {
            root: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(name) = base_name(entry.path()) else {
            continue;
        };

        match kinds.classify_walked(&name) {
            Some(FileKind::ProjectDefinition) => {
                debug!("Found project: {}", entry.path().display());
                inventory.projects.push(entry.into_path());
            }
            Some(FileKind::Source) => inventory.sources.push(name),
            None => {}
        }
    }

    inventory.sources.sort();
    inventory.sources.dedup();

    info!(
        "Walked {}: {} projects, {} distinct sources",
        root.display(),
        inventory.projects.len(),
        inventory.sources.len()
    );

    Ok(inventory)
}
