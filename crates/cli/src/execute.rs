//! Build execution for selected projects

use anyhow::{Context, Result};
use cache::CompilerInvocation;
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Result of building one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    Succeeded,
    /// Only the plan was printed
    Planned,
    Failed(String),
}

impl BuildOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, BuildOutcome::Failed(_))
    }
}

/// Builds one project at a time
pub trait BuildExecutor {
    /// Build `project` because `sources` changed
    ///
    /// A compiler that ran and failed is an `Ok(Failed)`; `Err` is
    /// reserved for the executor itself breaking down.
    fn build(&mut self, project: &Path, sources: &[String]) -> Result<BuildOutcome>;
}

/// Prints what would be compiled without compiling
pub struct PlanOnly<W> {
    output: W,
}

impl<W: Write> PlanOnly<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }
}

impl<W: Write> BuildExecutor for PlanOnly<W> {
    fn build(&mut self, project: &Path, sources: &[String]) -> Result<BuildOutcome> {
        writeln!(
            self.output,
            "Compiling {} for files: [{}]",
            project.display(),
            sources.join(" ")
        )?;
        Ok(BuildOutcome::Planned)
    }
}

/// Runs the configured compiler once per project
pub struct CommandExecutor {
    program: String,
    args_before: Vec<String>,
    args_after: Vec<String>,
    working_dir: PathBuf,
}

impl CommandExecutor {
    /// Executor for `compiler`, or `None` when no program is configured
    pub fn from_settings(compiler: &CompilerInvocation, working_dir: &Path) -> Option<Self> {
        let program = compiler.program.clone()?;
        Some(Self {
            program,
            args_before: compiler.args_before.clone(),
            args_after: compiler.args_after.clone(),
            working_dir: working_dir.to_path_buf(),
        })
    }

    /// Full argument vector for `project`, program first
    pub fn command_line(&self, project: &Path) -> Vec<String> {
        let mut line = Vec::with_capacity(self.args_before.len() + self.args_after.len() + 2);
        line.push(self.program.clone());
        line.extend(self.args_before.iter().cloned());
        line.push(project.display().to_string());
        line.extend(self.args_after.iter().cloned());
        line
    }
}

impl BuildExecutor for CommandExecutor {
    fn build(&mut self, project: &Path, sources: &[String]) -> Result<BuildOutcome> {
        println!(
            "{} {} {}",
            "Compiling".green().bold(),
            project.display(),
            format!("({})", sources.join(", ")).dimmed()
        );
        debug!("Running {:?}", self.command_line(project));

        let status = Command::new(&self.program)
            .args(&self.args_before)
            .arg(project)
            .args(&self.args_after)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("Failed to launch {}", self.program))?;

        if status.success() {
            Ok(BuildOutcome::Succeeded)
        } else {
            warn!("{} failed: {}", project.display(), status);
            Ok(BuildOutcome::Failed(status.to_string()))
        }
    }
}
