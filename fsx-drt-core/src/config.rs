//! Configuration sources and the resolver.
//!
//! # Layering
//!
//! A [`RawConfig`] is a flat map keyed by the canonical names below. Callers
//! build it from as many sources as they like (config file, process
//! environment, CLI flags), later layers overriding earlier ones via
//! [`RawConfig::merge`], then hand it to [`resolve`] exactly once.
//!
//! # File layout
//!
//! ```text
//! ~/.fsx-drt/
//!   config.yaml     (optional defaults)
//! ```
//!
//! Every function touching the home directory has an `_at(home: &Path)` form;
//! tests must always use the `_at` variants.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigProblem};
use crate::paths::SEPARATOR;
use crate::types::{FileSystemId, TaskDirection};

pub const FILE_SYSTEM_ID: &str = "FILE_SYSTEM_ID";
pub const TASK_TYPE: &str = "TASK_TYPE";
pub const COMPLETION_REPORT_PATH: &str = "COMPLETION_REPORT_PATH";
pub const FSX_PATHS: &str = "FSX_PATHS";

/// Every key [`resolve`] requires, in reporting order.
pub const REQUIRED_KEYS: [&str; 4] = [FILE_SYSTEM_ID, TASK_TYPE, COMPLETION_REPORT_PATH, FSX_PATHS];

/// Separator between entries of `FSX_PATHS`.
pub const PATH_LIST_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// 1. Raw values
// ---------------------------------------------------------------------------

/// Unvalidated configuration values keyed by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    values: BTreeMap<String, String>,
}

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the canonical keys out of an arbitrary variable listing,
    /// typically `std::env::vars()`.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw = Self::new();
        for (key, value) in vars {
            let key = key.into();
            if REQUIRED_KEYS.contains(&key.as_str()) {
                raw.values.insert(key, value.into());
            }
        }
        raw
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Set `key` only when `value` is `Some`.
    pub fn set_opt(&mut self, key: impl Into<String>, value: Option<String>) -> &mut Self {
        if let Some(value) = value {
            self.values.insert(key.into(), value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: RawConfig) {
        self.values.extend(other.values);
    }

    fn present(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|v| !v.is_empty())
    }

    fn value(&self, key: &str) -> &str {
        self.present(key).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// 2. Resolved configuration
// ---------------------------------------------------------------------------

/// Validated configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskConfig {
    pub file_system_id: FileSystemId,
    pub direction: TaskDirection,
    /// Appended to the repository base path to form the report destination.
    pub report_sub_path: String,
    /// Caller-intended scope, de-duplicated, in first-seen order.
    pub target_paths: Vec<String>,
}

/// Validate `raw` and build a [`TaskConfig`].
///
/// Missing or blank required keys fail first, all named in one
/// [`ConfigError::Missing`]. Only when every key is present are values
/// checked for shape; those problems are likewise aggregated into one
/// [`ConfigError::Invalid`].
pub fn resolve(raw: &RawConfig) -> Result<TaskConfig, ConfigError> {
    let missing: Vec<&'static str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| raw.present(key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::Missing { keys: missing });
    }

    let mut problems = Vec::new();

    let file_system_id = FileSystemId::from(raw.value(FILE_SYSTEM_ID));
    if !file_system_id.is_well_formed() {
        problems.push(ConfigProblem {
            key: FILE_SYSTEM_ID,
            reason: format!(
                "'{file_system_id}' is not a file system id (must start with '{}')",
                FileSystemId::PREFIX
            ),
        });
    }

    let direction = match raw.value(TASK_TYPE).parse::<TaskDirection>() {
        Ok(direction) => Some(direction),
        Err(reason) => {
            problems.push(ConfigProblem {
                key: TASK_TYPE,
                reason,
            });
            None
        }
    };

    let report_sub_path = raw.value(COMPLETION_REPORT_PATH).to_owned();
    if report_sub_path.chars().all(|c| c == SEPARATOR) {
        problems.push(ConfigProblem {
            key: COMPLETION_REPORT_PATH,
            reason: "must name a location below the repository root".to_owned(),
        });
    }

    let target_paths = split_path_list(raw.value(FSX_PATHS));
    if target_paths.is_empty() {
        problems.push(ConfigProblem {
            key: FSX_PATHS,
            reason: "no paths listed".to_owned(),
        });
    }

    match direction {
        Some(direction) if problems.is_empty() => Ok(TaskConfig {
            file_system_id,
            direction,
            report_sub_path,
            target_paths,
        }),
        _ => Err(ConfigError::Invalid { problems }),
    }
}

/// Split a comma-separated path list, dropping blanks and repeats.
pub fn split_path_list(value: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    for item in value.split(PATH_LIST_SEPARATOR).map(str::trim) {
        if !item.is_empty() && !paths.iter().any(|p| p == item) {
            paths.push(item.to_owned());
        }
    }
    paths
}

// ---------------------------------------------------------------------------
// 3. Config file
// ---------------------------------------------------------------------------

/// On-disk defaults, `~/.fsx-drt/config.yaml` unless a path is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_system_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_report_path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    /// AWS region override for the FSx client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl ConfigFile {
    /// The task values as a config layer. `region` is not a task value and
    /// is read by callers directly.
    pub fn to_raw(&self) -> RawConfig {
        let mut raw = RawConfig::new();
        raw.set_opt(FILE_SYSTEM_ID, self.file_system_id.clone())
            .set_opt(TASK_TYPE, self.task_type.clone())
            .set_opt(COMPLETION_REPORT_PATH, self.completion_report_path.clone());
        if !self.paths.is_empty() {
            raw.set(FSX_PATHS, self.paths.join(","));
        }
        raw
    }
}

/// `<home>/.fsx-drt/config.yaml`; pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".fsx-drt").join("config.yaml")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_path_at(&home()?))
}

/// Load and parse a config file at an explicit path.
pub fn load_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load `<home>/.fsx-drt/config.yaml` if it exists.
pub fn load_default_at(home: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Ok(None);
    }
    load_file(&path).map(Some)
}

/// `load_default_at` convenience wrapper.
pub fn load_default() -> Result<Option<ConfigFile>, ConfigError> {
    load_default_at(&home()?)
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
