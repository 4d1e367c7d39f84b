//! Settings management command
//!
//! Settings live in the repository cache file next to the dependency map.

use anyhow::{Context, Result};
use cache::{RunConfig, SETTING_KEYS};
use cli_lib::util;
use owo_colors::OwoColorize;
use std::path::Path;

/// Keys whose change makes the cached dependency map meaningless
const MAP_INVALIDATING_KEYS: &[&str] = &[
    "source_extension",
    "project_extension",
    "skip_patterns",
    "candidate_scope",
];

/// List all settings
pub fn run_list(path: Option<&Path>) -> Result<()> {
    let repo_root = util::resolve_repo_root(path)?;
    let config = util::load_run_config_strict(&repo_root)?;

    println!("{}", "Build Settings".bold());
    println!(
        "{}: {}\n",
        "Location".dimmed(),
        RunConfig::path_in(&repo_root).display().dimmed()
    );

    for key in SETTING_KEYS {
        let value = config.settings.get(key)?;
        if value.is_empty() {
            println!("  {} = {}", key.cyan(), "(unset)".dimmed());
        } else {
            println!("  {} = {}", key.cyan(), value);
        }
    }

    println!("\n{}", "Valid Ranges:".bold());
    println!("  scan_concurrency: 0-4096 (0 = unbounded)");
    println!("  candidate_scope: changed | all_sources");
    println!("  timestamp_format: unix_millis | rfc3339");
    println!("  bootstrap_interval_hours: 1-8760");
    println!("  skip_patterns: comma-separated gitignore patterns");

    Ok(())
}

/// Get a single setting
pub fn run_get(path: Option<&Path>, key: &str) -> Result<()> {
    let repo_root = util::resolve_repo_root(path)?;
    let config = util::load_run_config_strict(&repo_root)?;

    let value = config
        .settings
        .get(key)
        .context("Use 'ib config list' to see available keys")?;

    println!("{}", value);
    Ok(())
}

/// Set a setting
pub fn run_set(path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let repo_root = util::resolve_repo_root(path)?;
    let mut config = util::load_run_config_strict(&repo_root)?;

    config
        .settings
        .set(key, value)
        .context("Invalid configuration value")?;

    let clear_map = MAP_INVALIDATING_KEYS.contains(&key) && config.dependency_map().is_some();
    if clear_map {
        config.clear_dependency_map();
    }

    config.save(&repo_root).context("Failed to save cache")?;

    println!("{} Set {} = {}", "✓".green(), key.cyan(), value);
    if clear_map {
        println!(
            "  {}",
            "Cached dependencies cleared; the next run rescans every project".dimmed()
        );
    }

    Ok(())
}
