//! Compiler settings for script-like configuration sources.
//!
//! These settings control how `config.ts` / `config.js` / `config.mjs` /
//! `config.cjs` are bundled and evaluated. `config.json` never touches them.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Where the bundler writes the compiled artifact.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactMode {
    /// The bundler writes a uniquely named file beside the source.
    #[default]
    File,

    /// The bundler writes to stdout; the bytes are materialized into a
    /// short-lived temporary file only because the loader needs a path.
    Memory,
}

impl ArtifactMode {
    /// Parse `file` / `memory` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("file") {
            Some(Self::File)
        } else if value.eq_ignore_ascii_case("memory") || value.eq_ignore_ascii_case("in-memory") {
            Some(Self::Memory)
        } else {
            None
        }
    }
}

/// Represents the toolchain used to turn script configs into JSON values.
///
/// # Example
///
/// ```json
/// {
///   "esbuild": "esbuild",
///   "node": "node",
///   "target": "node18",
///   "artifactMode": "file"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerSettings {
    /// Bundler command (name on `PATH` or absolute path).
    pub esbuild: String,

    /// Loader command (name on `PATH` or absolute path).
    pub node: String,

    /// Bundler target, passed as `--target=<target>`.
    pub target: String,

    /// Where the compiled artifact is written.
    pub artifact_mode: ArtifactMode,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            esbuild: "esbuild".to_string(),
            node: "node".to_string(),
            target: "node18".to_string(),
            artifact_mode: ArtifactMode::File,
        }
    }
}

impl CompilerSettings {
    pub fn with_esbuild(mut self, esbuild: impl Into<String>) -> Self {
        self.esbuild = esbuild.into();
        self
    }

    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = node.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_artifact_mode(mut self, artifact_mode: ArtifactMode) -> Self {
        self.artifact_mode = artifact_mode;
        self
    }
}
