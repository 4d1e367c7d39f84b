//! Persisted run state
//!
//! This crate provides:
//! - `RunConfig`: the dependency map, environment gate timestamp and
//!   tuning settings, stored as JSON in the repository root
//! - `Settings`: enumerated tuning options with validation
//! - Gate timestamp encoding in either supported format

pub mod settings;
pub mod store;
pub mod timestamp;

// Re-exports
pub use settings::{
    CandidateScope, CompilerInvocation, Settings, SettingsError, TimestampFormat, SETTING_KEYS,
};
pub use store::{RunConfig, CACHE_FILE_NAME};
pub use timestamp::StoredTimestamp;

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or saving the run state
#[derive(Debug, Error)]
pub enum CacheError {
    /// No cache file yet (first run)
    #[error("no cache file at {}", path.display())]
    NotFound { path: PathBuf },

    /// The cache file exists but is not valid run state
    #[error("cache file {} is unparsable: {source}", path.display())]
    Unparsable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the cache file failed
    #[error("cache I/O on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run state could not be encoded
    #[error("failed to encode cache: {0}")]
    Encode(#[source] serde_json::Error),
}

impl CacheError {
    /// Whether this error means "there is no usable cache"
    ///
    /// Absent and unparsable files both send the selector down the
    /// rebuild path instead of aborting.
    pub fn is_missing_cache(&self) -> bool {
        matches!(self, CacheError::NotFound { .. } | CacheError::Unparsable { .. })
    }
}

/// Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
