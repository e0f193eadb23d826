//! Compiler traits and supporting types.

use async_trait::async_trait;
use dd_protocol::lookup_models::CompiledConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::DotDirResult;
use crate::locate::ConfigCandidate;

/// Turns a discovered `config.*` file into its configuration value.
#[async_trait]
pub trait ConfigCompiler: Send + Sync {
    async fn compile(&self, candidate: &ConfigCandidate) -> DotDirResult<CompiledConfig>;

    /// Compile with the file's content already in hand.
    ///
    /// `source` is the exact bytes the caller hashed. Implementations that
    /// can work from bytes should, so the result matches that hash.
    async fn compile_source(
        &self,
        candidate: &ConfigCandidate,
        source: &[u8],
    ) -> DotDirResult<CompiledConfig> {
        let _ = source;
        self.compile(candidate).await
    }
}

/// A request to bundle one script source into a self-contained ES module.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    /// The `config.*` source file.
    pub entry: PathBuf,

    /// Working directory for the bundler (the dot directory).
    pub work_dir: PathBuf,

    /// Runtime target, e.g. `node18`.
    pub target: String,

    /// Where to write the bundle. `None` asks for the bytes in memory.
    pub outfile: Option<PathBuf>,
}

/// What the bundler produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutput {
    /// The bundle was written to the requested `outfile`.
    Written,

    /// The bundle bytes, for requests without an `outfile`.
    Memory(Vec<u8>),
}

/// Bundles script sources.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn bundle(&self, request: &BundleRequest) -> DotDirResult<BundleOutput>;
}

/// The default export of an evaluated artifact, as reported by the loader.
///
/// ```json
/// { "hasDefault": true, "value": { "port": 8080 } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedModule {
    /// Whether the module exposed a default export other than `undefined`/`null`.
    pub has_default: bool,

    /// The default export, serialized as JSON.
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Evaluates an artifact and retrieves its default export.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load `artifact`. `source` is the original `config.*` file, used for
    /// error reporting only.
    async fn load(&self, artifact: &Path, source: &Path) -> DotDirResult<LoadedModule>;
}
