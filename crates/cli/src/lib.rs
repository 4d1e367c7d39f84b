//! intellibuild CLI library
//!
//! The run pipeline, split so each stage can be driven from tests:
//! - `gate`: time-gated environment bootstrap
//! - `select`: cache-or-rebuild decision and dirty project selection
//! - `present`: per-project build decisions
//! - `execute`: compiler invocation or plan output

pub mod execute;
pub mod gate;
pub mod logging;
pub mod present;
pub mod select;
pub mod util;

pub use execute::{BuildExecutor, BuildOutcome, CommandExecutor, PlanOnly};
pub use gate::{Bootstrap, EnvironmentGate, ScriptBootstrap};
pub use present::{AutoApprove, Decision, PromptPresenter, Presenter};
pub use select::{Branch, BuildSelector, RebuildReason, Selection};
