//! On-disk run state for a repository
//!
//! Stored as `.intellibuild.json` in the repository root:
//! ```text
//! {
//!   "project_file_map": { "/abs/App.cbproj": ["main.cpp", "util.cpp"] },
//!   "last_bootstrap": 1700000000000,
//!   "settings": { "source_extension": "cpp", ... }
//! }
//! ```
//! Files written by earlier releases used `ProjectFileMap` and may hold
//! `null` there; both still load. An absent or `null` map means there is
//! no usable dependency data and the next run rescans every project.
//!
//! Each top-level section decodes on its own. A section that does not
//! decode is dropped with a warning, except `settings`, which is written
//! back exactly as it was read.

use crate::settings::Settings;
use crate::timestamp::StoredTimestamp;
use crate::{CacheError, Result};
use chrono::{DateTime, Utc};
use ib_core::DependencyMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Well-known cache file name inside the repository root
pub const CACHE_FILE_NAME: &str = ".intellibuild.json";

const MAP_KEY: &str = "project_file_map";
const LEGACY_MAP_KEY: &str = "ProjectFileMap";
const BOOTSTRAP_KEY: &str = "last_bootstrap";
const SETTINGS_KEY: &str = "settings";

/// Everything persisted between runs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunConfig {
    /// Project definition path -> referenced source names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_file_map: Option<DependencyMap>,

    /// When the environment bootstrap last ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_bootstrap: Option<StoredTimestamp>,

    /// Tuning settings
    pub settings: Settings,

    /// Top-level keys this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Stored `settings` that did not decode, written back verbatim
    #[serde(skip)]
    undecoded_settings: Option<Value>,
}

impl RunConfig {
    /// Path of the cache file for a repository root
    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(CACHE_FILE_NAME)
    }

    /// Load run state from `dir`
    ///
    /// Fails with `NotFound` when there is no cache file and `Unparsable`
    /// when its content is not a JSON object. Out-of-range settings are
    /// reset to their defaults.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = Self::path_in(dir);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheError::NotFound { path });
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let fields: Map<String, Value> = serde_json::from_str(&content)
            .map_err(|source| CacheError::Unparsable { path: path.clone(), source })?;
        let mut config = Self::from_fields(fields, &path);

        for reset in config.settings.repair() {
            warn!("{}: {}; using the default", path.display(), reset);
        }

        debug!(
            "Loaded cache {}: {} projects",
            path.display(),
            config.project_file_map.as_ref().map_or(0, DependencyMap::len)
        );

        Ok(config)
    }

    /// Write run state to `dir`
    ///
    /// Writes a temp file next to the target and renames it into place,
    /// so a failed save never leaves a truncated cache behind.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = Self::path_in(dir);
        let io_err = |source: std::io::Error| CacheError::Io {
            path: path.clone(),
            source,
        };

        let mut data = match self.undecoded_settings {
            None => serde_json::to_vec_pretty(self),
            Some(ref raw) => {
                let mut document = serde_json::to_value(self).map_err(CacheError::Encode)?;
                if let Some(fields) = document.as_object_mut() {
                    fields.insert(SETTINGS_KEY.to_string(), raw.clone());
                }
                serde_json::to_vec_pretty(&document)
            }
        }
        .map_err(CacheError::Encode)?;
        data.push(b'\n');

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&data).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        debug!(
            "Saved cache {}: {} projects",
            path.display(),
            self.project_file_map.as_ref().map_or(0, DependencyMap::len)
        );

        Ok(())
    }

    fn from_fields(mut fields: Map<String, Value>, path: &Path) -> Self {
        let legacy_map = fields.remove(LEGACY_MAP_KEY);
        let map = fields.remove(MAP_KEY).or(legacy_map);
        let last_bootstrap = fields.remove(BOOTSTRAP_KEY);
        let settings = fields.remove(SETTINGS_KEY);

        let mut config = RunConfig {
            project_file_map: map.and_then(|value| decode_section(path, MAP_KEY, value)),
            last_bootstrap: last_bootstrap
                .and_then(|value| decode_section(path, BOOTSTRAP_KEY, value)),
            extra: fields,
            ..RunConfig::default()
        };

        if let Some(raw) = settings {
            match serde_json::from_value::<Option<Settings>>(raw.clone()) {
                Ok(settings) => config.settings = settings.unwrap_or_default(),
                Err(e) => {
                    warn!("Ignoring settings in {}: {}", path.display(), e);
                    config.undecoded_settings = Some(raw);
                }
            }
        }

        config
    }

    /// Whether the stored settings could not be decoded
    ///
    /// Defaults are in effect and the stored object is kept on save.
    pub fn has_undecoded_settings(&self) -> bool {
        self.undecoded_settings.is_some()
    }

    /// Cached dependency map, if there is one
    pub fn dependency_map(&self) -> Option<&DependencyMap> {
        self.project_file_map.as_ref()
    }

    /// Replace the cached dependency map
    pub fn set_dependency_map(&mut self, map: DependencyMap) {
        self.project_file_map = Some(map);
    }

    /// Drop the cached dependency map so the next run rescans
    pub fn clear_dependency_map(&mut self) {
        self.project_file_map = None;
    }

    /// When the environment bootstrap last ran, if known
    pub fn last_bootstrap_at(&self) -> Option<DateTime<Utc>> {
        self.last_bootstrap.as_ref().and_then(StoredTimestamp::decode)
    }

    /// Record a bootstrap time in the configured format
    pub fn record_bootstrap(&mut self, at: DateTime<Utc>) {
        self.last_bootstrap = Some(StoredTimestamp::encode(at, &self.settings.timestamp_format));
    }
}

/// Decode one section; `null` and undecodable values yield `None`
fn decode_section<T: DeserializeOwned>(path: &Path, key: &str, value: Value) -> Option<T> {
    match serde_json::from_value::<Option<T>>(value) {
        Ok(section) => section,
        Err(e) => {
            warn!("Ignoring {} in {}: {}", key, path.display(), e);
            None
        }
    }
}
