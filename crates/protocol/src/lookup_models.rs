//! Lookup request and response models.
//!
//! These are the values that cross the public `find` boundary: the options a
//! caller passes in, and the configuration plus location metadata handed
//! back.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use ts_rs::TS;

use crate::extension_models::ConfigExtension;

/// A loaded configuration value: the default export of a `config.*` file.
///
/// The shape is caller-defined; dotdir only guarantees it is a JSON object.
pub type CompiledConfig = serde_json::Map<String, serde_json::Value>;

/// Options for a single lookup.
///
/// Both fields are optional:
/// ```json
/// { "cwd": "/work/app/src", "dirName": "myapp" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct FindOptions {
    /// Directory the upward search starts from.
    ///
    /// Defaults to the process working directory. Relative paths are
    /// resolved against it.
    pub cwd: Option<PathBuf>,

    /// Dot directory name without the leading `.`.
    ///
    /// When absent, the `name` field of `package.json` in `cwd` is used.
    pub dir_name: Option<String>,
}

impl FindOptions {
    /// Options that search from the process working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting directory.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Set the dot directory name (without the leading `.`).
    pub fn with_dir_name(mut self, dir_name: impl Into<String>) -> Self {
        self.dir_name = Some(dir_name.into());
        self
    }
}

/// Where a configuration was found.
///
/// Metadata is assembled fresh on every lookup, even when the configuration
/// itself comes from the cache.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMeta {
    /// Absolute path of the `config.*` file that was read.
    pub file_path: PathBuf,

    /// Extension of that file.
    pub ext: ConfigExtension,

    /// Resolved dot directory name, including the leading `.`.
    pub dir_name: String,

    /// Absolute path of the dot directory.
    pub dir_path: PathBuf,
}

/// The result of a successful lookup.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct DotDirResponse {
    /// The default export of the configuration file.
    #[ts(type = "Record<string, unknown>")]
    pub config: CompiledConfig,

    /// Location metadata for `config`.
    pub meta: ConfigMeta,
}
