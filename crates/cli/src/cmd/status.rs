//! Show what a run would select, without side effects

use anyhow::{Context, Result};
use chrono::Utc;
use cli_lib::util;
use cli_lib::{BuildSelector, EnvironmentGate, ScriptBootstrap};
use owo_colors::OwoColorize;
use std::path::Path;
use vcs::{classify_changes, GitStatusSource};

pub async fn run(path: Option<&Path>) -> Result<()> {
    // 1. Resolve repository root and load state (never saved here)
    let repo_root = util::resolve_repo_root(path)?;
    let (config, cached) = util::load_run_state(&repo_root);
    let settings = &config.settings;

    // 2. Classify working tree changes
    let status = GitStatusSource::open(&repo_root).context("Failed to open repository")?;
    let changes = classify_changes(&status, &settings.file_kinds())
        .context("Failed to classify working tree changes")?;

    // 3. Select (a rebuild scan reads project files but writes nothing)
    let cache_state = match cached {
        Some(ref map) => format!("{} cached", util::plural(map.len(), "project")),
        None => "none".to_string(),
    };
    let selection = BuildSelector::new(&repo_root, settings)
        .select(&changes, cached)
        .await
        .context("Failed to scan project definitions")?;

    // 4. Display
    println!("{}", "Build Status".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();

    println!("Repository:    {}", repo_root.display().to_string().cyan());
    println!("Cache:         {}", cache_state);

    let now = Utc::now();
    print!("Bootstrap:     ");
    match settings.bootstrap_script {
        None => println!("{}", "not configured".dimmed()),
        Some(ref script) => {
            let gate = EnvironmentGate::new(
                Some(ScriptBootstrap::new(&repo_root, script)),
                settings.bootstrap_interval(),
            );
            let last = config.last_bootstrap_at();
            let when = last
                .map(|at| util::format_relative_time(at, now))
                .unwrap_or_else(|| "never".to_string());
            if gate.is_due(last, now) {
                println!("{} {}", script.display(), format!("(last {}, due)", when).yellow());
            } else {
                println!("{} {}", script.display(), format!("(last {})", when).dimmed());
            }
        }
    }
    println!();

    println!("Changed sources ({}):", changes.changed_sources.len());
    for name in &changes.changed_sources {
        println!("  {}", name);
    }
    if !changes.changed_project_defs.is_empty() {
        println!("Changed project definitions ({}):", changes.changed_project_defs.len());
        for name in &changes.changed_project_defs {
            println!("  {}", name.yellow());
        }
    }
    println!();

    println!("Selection:     {}", selection.branch.describe());
    if selection.dirty.is_empty() {
        println!("  {}", "Nothing to build".green());
    } else {
        println!("Would build ({}):", selection.dirty.len());
        for (project, sources) in selection.dirty.iter() {
            println!(
                "  {} {}",
                util::display_project(&repo_root, project).cyan(),
                format!("({})", sources.join(", ")).dimmed()
            );
        }
    }

    Ok(())
}
