//! Accepted configuration file extensions.
//!
//! A dot directory holds exactly one `config.<ext>` file that dotdir reads.
//! When more than one exists, the extension earliest in
//! [`ConfigExtension::PRIORITY`] wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// The extension of a `config.*` source file.
///
/// Serialized in lowercase so it matches the on-disk suffix:
/// ```json
/// "ts"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum ConfigExtension {
    /// Plain JSON data, parsed directly.
    Json,

    /// TypeScript module with a default export.
    Ts,

    /// JavaScript module with a default export.
    Js,

    /// ES module with a default export.
    Mjs,

    /// CommonJS module whose `module.exports` becomes the default export.
    Cjs,
}

impl ConfigExtension {
    /// Every accepted extension, in lookup priority order.
    pub const PRIORITY: [ConfigExtension; 5] = [
        ConfigExtension::Json,
        ConfigExtension::Ts,
        ConfigExtension::Js,
        ConfigExtension::Mjs,
        ConfigExtension::Cjs,
    ];

    /// The file suffix without the leading dot.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ts => "ts",
            Self::Js => "js",
            Self::Mjs => "mjs",
            Self::Cjs => "cjs",
        }
    }

    /// The full file name, e.g. `config.ts`.
    pub fn file_name(&self) -> String {
        format!("config.{}", self.as_str())
    }

    /// Whether the format is pure data and needs no compilation step.
    pub fn is_data(&self) -> bool {
        matches!(self, Self::Json)
    }

    /// Parse a suffix (case-sensitive) back into an extension.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::PRIORITY.into_iter().find(|ext| ext.as_str() == suffix)
    }

    /// Human-readable glob of every accepted file name,
    /// e.g. `config.{json|ts|js|mjs|cjs}`.
    pub fn accepted_pattern() -> String {
        let joined = Self::PRIORITY
            .iter()
            .map(ConfigExtension::as_str)
            .collect::<Vec<_>>()
            .join("|");
        format!("config.{{{joined}}}")
    }
}

impl fmt::Display for ConfigExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
