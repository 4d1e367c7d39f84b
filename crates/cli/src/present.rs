//! Build decision presentation

use anyhow::{Context, Result};
use ib_core::DirtyProjectSet;
use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// What to do with one dirty project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Build,
    Skip,
    /// Stop the whole run; nothing is built
    Abort,
}

/// Turns a dirty set into per-project decisions
pub trait Presenter {
    /// Decisions in display order
    ///
    /// Stops at the first `Abort`, which is included as the last entry.
    fn present(&mut self, dirty: &DirtyProjectSet) -> Result<Vec<(PathBuf, Decision)>>;
}

/// Builds everything without asking
pub struct AutoApprove;

impl Presenter for AutoApprove {
    fn present(&mut self, dirty: &DirtyProjectSet) -> Result<Vec<(PathBuf, Decision)>> {
        Ok(dirty
            .iter()
            .map(|(project, _)| (project.to_path_buf(), Decision::Build))
            .collect())
    }
}

/// Asks about each project on a reader/writer pair
///
/// Answers: empty or `y` builds, `n` skips, `q` aborts. End of input
/// aborts. Anything else asks again.
pub struct PromptPresenter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPresenter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, project: &str, sources: &[String]) -> Result<Decision> {
        loop {
            write!(
                self.output,
                "{} {} {}  {} ",
                "?".yellow(),
                project.bold(),
                format!("({})", sources.join(", ")).dimmed(),
                "[Y/n/q]".dimmed()
            )?;
            self.output.flush()?;

            let mut answer = String::new();
            let read = self
                .input
                .read_line(&mut answer)
                .context("Failed to read answer")?;
            if read == 0 {
                writeln!(self.output)?;
                return Ok(Decision::Abort);
            }

            match answer.trim().to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(Decision::Build),
                "n" | "no" => return Ok(Decision::Skip),
                "q" | "quit" => return Ok(Decision::Abort),
                other => writeln!(self.output, "  Unrecognised answer '{}'", other)?,
            }
        }
    }
}

impl<R: BufRead, W: Write> Presenter for PromptPresenter<R, W> {
    fn present(&mut self, dirty: &DirtyProjectSet) -> Result<Vec<(PathBuf, Decision)>> {
        let mut decisions = Vec::with_capacity(dirty.len());

        for (project, sources) in dirty.iter() {
            let decision = self.ask(&project.display().to_string(), sources)?;
            decisions.push((project.to_path_buf(), decision));
            if decision == Decision::Abort {
                break;
            }
        }

        Ok(decisions)
    }
}

/// True when the decisions end in an abort
pub fn aborted(decisions: &[(PathBuf, Decision)]) -> bool {
    matches!(decisions.last(), Some((_, Decision::Abort)))
}
