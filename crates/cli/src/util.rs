//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use cache::{CacheError, RunConfig};
use chrono::{DateTime, Utc};
use ib_core::DependencyMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Resolve the repository root argument to an absolute path
///
/// Defaults to the current directory. The path must exist; it is not
/// searched upwards.
pub fn resolve_repo_root(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    path.canonicalize()
        .with_context(|| format!("Failed to resolve {}", path.display()))
}

/// Load run state for a pipeline run
///
/// Any cache that cannot be used yields default state. The dependency
/// map is `None` in that case, and when the cache holds no map, which
/// sends selection down the rebuild branch.
pub fn load_run_state(repo_root: &Path) -> (RunConfig, Option<DependencyMap>) {
    match RunConfig::load(repo_root) {
        Ok(config) => {
            let map = config.dependency_map().cloned();
            (config, map)
        }
        Err(e) if e.is_missing_cache() => {
            debug!("No usable cache: {}", e);
            (RunConfig::default(), None)
        }
        Err(e) => {
            warn!("Ignoring cache: {}", e);
            (RunConfig::default(), None)
        }
    }
}

/// Load run state for editing settings
///
/// A missing cache starts from defaults; a damaged one, or one whose
/// settings do not decode, is an error so that editing never silently
/// discards it.
pub fn load_run_config_strict(repo_root: &Path) -> Result<RunConfig> {
    match RunConfig::load(repo_root) {
        Ok(config) if config.has_undecoded_settings() => anyhow::bail!(
            "Failed to load cache: settings in {} could not be decoded",
            RunConfig::path_in(repo_root).display()
        ),
        Ok(config) => Ok(config),
        Err(CacheError::NotFound { .. }) => Ok(RunConfig::default()),
        Err(e) => Err(e).context("Failed to load cache"),
    }
}

/// Format a past instant relative to `now` ("3 hours ago")
pub fn format_relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed.num_milliseconds() < 0 {
        return "in the future".to_string();
    }

    let seconds = elapsed.num_seconds();
    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Show a project path relative to the root when it lives under it
pub fn display_project(root: &Path, project: &Path) -> String {
    project
        .strip_prefix(root)
        .unwrap_or(project)
        .display()
        .to_string()
}

/// Pluralize a count ("1 project", "3 projects")
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
