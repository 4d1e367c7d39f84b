//! Diagnostic logging setup
//!
//! Diagnostics go to stderr so that stdout carries only the build plan
//! and command output.

use tracing::Level;

/// Level for a `-v` count: warn, info, then debug and beyond
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber
///
/// Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .try_init();
}
