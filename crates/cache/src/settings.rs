//! Tuning settings stored alongside the dependency map
//!
//! Every field has a serde default so older cache files load unchanged,
//! and unknown keys are carried through a load/save cycle untouched.

use ib_core::FileKinds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Keys accepted by `Settings::get` / `Settings::set`
pub const SETTING_KEYS: &[&str] = &[
    "source_extension",
    "project_extension",
    "scan_concurrency",
    "candidate_scope",
    "timestamp_format",
    "bootstrap_script",
    "bootstrap_interval_hours",
    "skip_patterns",
    "compiler.program",
    "compiler.args_before",
    "compiler.args_after",
];

/// Keys whose values have a checked range
const RANGED_KEYS: &[&str] = &[
    "source_extension",
    "project_extension",
    "scan_concurrency",
    "bootstrap_interval_hours",
    "compiler.program",
];

/// Errors from editing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Which source names each project is scanned against on rebuild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateScope {
    /// Only the sources that changed in this run
    #[default]
    Changed,
    /// Every source file found by the walk
    AllSources,
    /// A scope this version does not know; behaves as `Changed`
    #[serde(untagged)]
    Unrecognized(String),
}

/// On-disk format for the environment gate timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// Milliseconds since the Unix epoch
    #[default]
    UnixMillis,
    /// RFC 3339 text
    Rfc3339,
    /// A format this version does not know; writes as `UnixMillis`
    #[serde(untagged)]
    Unrecognized(String),
}

/// How the compiler is invoked for one project
///
/// The command line is `program args_before... <project> args_after...`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerInvocation {
    /// Compiler executable; `None` prints the plan instead of building
    #[serde(default)]
    pub program: Option<String>,

    /// Arguments placed before the project path
    #[serde(default)]
    pub args_before: Vec<String>,

    /// Arguments placed after the project path
    #[serde(default)]
    pub args_after: Vec<String>,
}

/// Tuning settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Source file extension (default: cpp)
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Project definition extension (default: cbproj)
    #[serde(default = "default_project_extension")]
    pub project_extension: String,

    /// Max concurrent discovery tasks (default: 0 = one task per project)
    #[serde(default)]
    pub scan_concurrency: usize,

    /// Rebuild scan candidates (default: changed)
    #[serde(default)]
    pub candidate_scope: CandidateScope,

    /// Gate timestamp format (default: unix_millis)
    #[serde(default)]
    pub timestamp_format: TimestampFormat,

    /// Bootstrap executable relative to the repository root (default: none)
    #[serde(default)]
    pub bootstrap_script: Option<PathBuf>,

    /// Hours before the bootstrap is considered stale (default: 4)
    #[serde(default = "default_bootstrap_interval_hours")]
    pub bootstrap_interval_hours: u64,

    /// Gitignore-style patterns excluded from the project walk
    #[serde(default)]
    pub skip_patterns: Vec<String>,

    /// Compiler invocation layout
    #[serde(default)]
    pub compiler: CompilerInvocation,

    /// Keys this version does not know about
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            project_extension: default_project_extension(),
            scan_concurrency: 0,
            candidate_scope: CandidateScope::default(),
            timestamp_format: TimestampFormat::default(),
            bootstrap_script: None,
            bootstrap_interval_hours: default_bootstrap_interval_hours(),
            skip_patterns: Vec::new(),
            compiler: CompilerInvocation::default(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Settings {
    /// Extension markers for classification
    pub fn file_kinds(&self) -> FileKinds {
        FileKinds::new(self.source_extension.clone(), self.project_extension.clone())
    }

    /// Environment gate staleness window
    pub fn bootstrap_interval(&self) -> Duration {
        Duration::from_secs(self.bootstrap_interval_hours.saturating_mul(3600))
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        for key in RANGED_KEYS {
            self.check(key)?;
        }
        self.check_distinct_extensions()
    }

    /// Reset out-of-range values to their defaults
    ///
    /// Returns one error per value that was reset. Values this version
    /// does not recognize are left alone.
    pub fn repair(&mut self) -> Vec<SettingsError> {
        let defaults = Settings::default();
        let mut reset = Vec::new();

        for key in RANGED_KEYS {
            if let Err(e) = self.check(key) {
                self.reset(key, &defaults);
                reset.push(e);
            }
        }

        if let Err(e) = self.check_distinct_extensions() {
            self.reset("source_extension", &defaults);
            self.reset("project_extension", &defaults);
            reset.push(e);
        }

        reset
    }

    fn check(&self, key: &str) -> Result<(), SettingsError> {
        match key {
            "source_extension" => validate_extension(key, &self.source_extension),
            "project_extension" => validate_extension(key, &self.project_extension),
            "scan_concurrency" if self.scan_concurrency > 4096 => Err(invalid(
                key,
                &self.scan_concurrency.to_string(),
                "must be 0-4096 (0 = unbounded)",
            )),
            "bootstrap_interval_hours" if !(1..=8760).contains(&self.bootstrap_interval_hours) => {
                Err(invalid(key, &self.bootstrap_interval_hours.to_string(), "must be 1-8760"))
            }
            "compiler.program" => match self.compiler.program {
                Some(ref program) if program.trim().is_empty() => {
                    Err(invalid(key, program, "must not be empty"))
                }
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn check_distinct_extensions(&self) -> Result<(), SettingsError> {
        if self.source_extension.eq_ignore_ascii_case(&self.project_extension) {
            return Err(invalid(
                "project_extension",
                &self.project_extension,
                "must differ from source_extension",
            ));
        }
        Ok(())
    }

    fn reset(&mut self, key: &str, defaults: &Settings) {
        match key {
            "source_extension" => self.source_extension = defaults.source_extension.clone(),
            "project_extension" => self.project_extension = defaults.project_extension.clone(),
            "scan_concurrency" => self.scan_concurrency = defaults.scan_concurrency,
            "bootstrap_interval_hours" => {
                self.bootstrap_interval_hours = defaults.bootstrap_interval_hours
            }
            "compiler.program" => self.compiler.program = defaults.compiler.program.clone(),
            _ => {}
        }
    }

    /// Current value of a setting, formatted for display
    pub fn get(&self, key: &str) -> Result<String, SettingsError> {
        let value = match key {
            "source_extension" => self.source_extension.clone(),
            "project_extension" => self.project_extension.clone(),
            "scan_concurrency" => self.scan_concurrency.to_string(),
            "candidate_scope" => enum_name(&self.candidate_scope),
            "timestamp_format" => enum_name(&self.timestamp_format),
            "bootstrap_script" => self
                .bootstrap_script
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "bootstrap_interval_hours" => self.bootstrap_interval_hours.to_string(),
            "skip_patterns" => self.skip_patterns.join(","),
            "compiler.program" => self.compiler.program.clone().unwrap_or_default(),
            "compiler.args_before" => self.compiler.args_before.join(" "),
            "compiler.args_after" => self.compiler.args_after.join(" "),
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        };
        Ok(value)
    }

    /// Set a setting from its textual form, then validate
    ///
    /// Empty values clear optional settings. List settings split on
    /// commas (`skip_patterns`) or whitespace (compiler arguments).
    /// On validation failure the settings are left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut updated = self.clone();

        match key {
            "source_extension" => updated.source_extension = value.trim_start_matches('.').to_string(),
            "project_extension" => updated.project_extension = value.trim_start_matches('.').to_string(),
            "scan_concurrency" => {
                updated.scan_concurrency = value
                    .parse()
                    .map_err(|_| invalid(key, value, "must be a non-negative integer"))?;
            }
            "candidate_scope" => {
                updated.candidate_scope = match value {
                    "changed" => CandidateScope::Changed,
                    "all_sources" => CandidateScope::AllSources,
                    _ => return Err(invalid(key, value, "not a recognized option")),
                };
            }
            "timestamp_format" => {
                updated.timestamp_format = match value {
                    "unix_millis" => TimestampFormat::UnixMillis,
                    "rfc3339" => TimestampFormat::Rfc3339,
                    _ => return Err(invalid(key, value, "not a recognized option")),
                };
            }
            "bootstrap_script" => {
                updated.bootstrap_script = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "bootstrap_interval_hours" => {
                updated.bootstrap_interval_hours = value
                    .parse()
                    .map_err(|_| invalid(key, value, "must be a positive integer"))?;
            }
            "skip_patterns" => {
                updated.skip_patterns = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "compiler.program" => {
                updated.compiler.program = (!value.is_empty()).then(|| value.to_string());
            }
            "compiler.args_before" => updated.compiler.args_before = split_args(value),
            "compiler.args_after" => updated.compiler.args_after = split_args(value),
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }

        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn default_source_extension() -> String {
    "cpp".to_string()
}

fn default_project_extension() -> String {
    "cbproj".to_string()
}

fn default_bootstrap_interval_hours() -> u64 {
    4
}

fn invalid(key: &str, value: &str, reason: &str) -> SettingsError {
    SettingsError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_extension(key: &str, ext: &str) -> Result<(), SettingsError> {
    if ext.is_empty() || ext.contains('.') || ext.contains(std::path::is_separator) {
        return Err(invalid(key, ext, "must be a bare extension such as 'cpp'"));
    }
    Ok(())
}

fn split_args(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// snake_case name of a unit enum variant via its serde form
fn enum_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}
