//! Full build pipeline: gate, classify, select, present, save, execute

use anyhow::{Context, Result};
use cache::RunConfig;
use chrono::Utc;
use cli_lib::present::aborted;
use cli_lib::util;
use cli_lib::{
    AutoApprove, BuildExecutor, BuildOutcome, BuildSelector, CommandExecutor, Decision,
    EnvironmentGate, PlanOnly, PromptPresenter, Presenter, ScriptBootstrap,
};
use ib_core::DependencyMap;
use indicatif::ProgressBar;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;
use vcs::{classify_changes, GitStatusSource};

/// Flags for one run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub assume_yes: bool,
    pub dry_run: bool,
    pub force_bootstrap: bool,
    pub rebuild_cache: bool,
}

pub async fn run(path: Option<&Path>, options: RunOptions) -> Result<()> {
    // 1. Resolve repository root, load state and open the repository
    let repo_root = util::resolve_repo_root(path)?;
    let (mut config, cached) = util::load_run_state(&repo_root);
    let settings = config.settings.clone();
    let status = GitStatusSource::open(&repo_root).context("Failed to open repository")?;

    // 2. Environment gate
    let bootstrap = settings
        .bootstrap_script
        .as_deref()
        .map(|script| ScriptBootstrap::new(&repo_root, script));
    let gate = EnvironmentGate::new(bootstrap, settings.bootstrap_interval());
    let last = config.last_bootstrap_at();
    let ran_at = gate.maybe_bootstrap(last, options.force_bootstrap, Utc::now());
    if let Some(at) = ran_at.filter(|at| Some(*at) != last) {
        config.record_bootstrap(at);
    }

    // 3. Classify working tree changes
    let changes = classify_changes(&status, &settings.file_kinds())
        .context("Failed to classify working tree changes")?;

    // 4. Select dirty projects
    let selector = BuildSelector::new(&repo_root, &settings).force_rebuild(options.rebuild_cache);
    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Selecting projects...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let selection = selector.select(&changes, cached).await;
    spinner.finish_and_clear();
    let selection = selection.context("Failed to scan project definitions")?;

    println!(
        "{} {} changed, {} {}",
        "Changes:".bold(),
        util::plural(changes.changed_sources.len(), "source"),
        util::plural(changes.changed_project_defs.len(), "project definition"),
        format!("[{}]", selection.branch.describe()).dimmed()
    );

    // 5. Decide what to build, then persist the map before any compiler runs
    let dirty = &selection.dirty;
    let decide = || {
        if dirty.is_empty() {
            println!("{}", "Nothing to build".green());
            Ok(Vec::new())
        } else if options.assume_yes || options.dry_run {
            AutoApprove.present(dirty)
        } else {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            PromptPresenter::new(stdin.lock(), stdout.lock()).present(dirty)
        }
    };
    let decisions = decide_and_save(decide, &mut config, selection.dependency_map, &repo_root)?;

    if aborted(&decisions) {
        println!("{}", "Aborted, nothing built".yellow());
        return Ok(());
    }

    // 7. Build
    let mut executor: Box<dyn BuildExecutor> =
        match CommandExecutor::from_settings(&settings.compiler, &repo_root) {
            Some(executor) if !options.dry_run => Box::new(executor),
            _ => Box::new(PlanOnly::new(std::io::stdout())),
        };

    let mut built = 0;
    let mut failed = Vec::new();
    for (project, decision) in &decisions {
        if *decision != Decision::Build {
            continue;
        }
        let sources = selection.dirty.get(project).unwrap_or_default();

        match executor.build(project, sources) {
            Ok(BuildOutcome::Failed(reason)) => {
                println!("{} {} ({})", "✗".red(), util::display_project(&repo_root, project), reason);
                failed.push(project.clone());
            }
            Ok(_) => built += 1,
            Err(e) => {
                println!("{} {}: {:#}", "✗".red(), util::display_project(&repo_root, project), e);
                failed.push(project.clone());
            }
        }
    }

    if !options.dry_run && built > 0 && failed.is_empty() {
        println!("{} {}", "✓".green(), util::plural(built, "project"));
    }

    if !failed.is_empty() {
        anyhow::bail!("{} failed to build", util::plural(failed.len(), "project"));
    }

    Ok(())
}

/// Collect build decisions and save run state whatever they turn out to be
///
/// The save happens before a presenter error is returned, so a rescanned
/// map and a recorded bootstrap survive a failed prompt.
fn decide_and_save(
    decide: impl FnOnce() -> Result<Vec<(PathBuf, Decision)>>,
    config: &mut RunConfig,
    map: DependencyMap,
    repo_root: &Path,
) -> Result<Vec<(PathBuf, Decision)>> {
    let decisions = decide();

    config.set_dependency_map(map);
    if let Err(e) = config.save(repo_root) {
        warn!("Failed to save cache: {}", e);
    }

    decisions.context("Failed to collect build decisions")
}
