//! Environment gate
//!
//! Re-runs the environment bootstrap at most once per staleness window.
//! The bootstrap is best effort: its failure is logged and the recorded
//! time still advances, so a broken script is retried on the next window
//! rather than on every run.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Something that prepares the build environment
pub trait Bootstrap {
    /// Run the bootstrap once
    fn run(&self) -> Result<()>;
}

/// Runs an executable with no arguments and inherited stdio
pub struct ScriptBootstrap {
    script: PathBuf,
    working_dir: PathBuf,
}

impl ScriptBootstrap {
    /// `script` is resolved against `repo_root` when relative
    pub fn new(repo_root: &Path, script: &Path) -> Self {
        Self {
            script: repo_root.join(script),
            working_dir: repo_root.to_path_buf(),
        }
    }
}

impl Bootstrap for ScriptBootstrap {
    fn run(&self) -> Result<()> {
        let status = Command::new(&self.script)
            .current_dir(&self.working_dir)
            .status()
            .with_context(|| format!("Failed to launch {}", self.script.display()))?;

        if !status.success() {
            anyhow::bail!("{} exited with {}", self.script.display(), status);
        }
        Ok(())
    }
}

/// Time-based gate around an optional bootstrap
pub struct EnvironmentGate<B> {
    bootstrap: Option<B>,
    interval: Duration,
}

impl<B: Bootstrap> EnvironmentGate<B> {
    /// Gate `bootstrap` behind a staleness window of `interval`
    ///
    /// Intervals beyond chrono's range are clamped to a century.
    pub fn new(bootstrap: Option<B>, interval: std::time::Duration) -> Self {
        let interval = Duration::from_std(interval).unwrap_or_else(|_| Duration::days(365 * 100));
        Self { bootstrap, interval }
    }

    /// Whether a bootstrap is due at `now`
    ///
    /// Due when never run, or when strictly more than the interval has
    /// elapsed. A timestamp in the future is treated as not due.
    pub fn is_due(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last {
            None => true,
            Some(last) => now.signed_duration_since(last) > self.interval,
        }
    }

    /// Run the bootstrap if forced or due, returning the time to record
    ///
    /// Returns `last` unchanged when nothing ran. With no bootstrap
    /// configured the gate never fires.
    pub fn maybe_bootstrap(
        &self,
        last: Option<DateTime<Utc>>,
        force: bool,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let Some(ref bootstrap) = self.bootstrap else {
            debug!("No bootstrap configured");
            return last;
        };

        if !force && !self.is_due(last, now) {
            debug!("Bootstrap not due (last run {:?})", last);
            return last;
        }

        info!("Running environment bootstrap");
        if let Err(e) = bootstrap.run() {
            warn!("Environment bootstrap failed: {:#}", e);
        }

        Some(now)
    }
}
