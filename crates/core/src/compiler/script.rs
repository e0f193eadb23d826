//! Default [`ConfigCompiler`]: JSON is parsed directly, scripts are bundled
//! and then evaluated.

use async_trait::async_trait;
use dd_protocol::config_models::{ArtifactMode, CompilerSettings};
use dd_protocol::lookup_models::CompiledConfig;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::compiler::adapters::{EsbuildBundler, NodeLoader};
use crate::compiler::artifact::{self, ArtifactGuard};
use crate::compiler::base::{
    BundleOutput, BundleRequest, Bundler, ConfigCompiler, LoadedModule, ModuleLoader,
};
use crate::error::{DotDirError, DotDirResult};
use crate::locate::ConfigCandidate;

/// Compiles `config.*` files using a [`Bundler`] and a [`ModuleLoader`].
pub struct ScriptCompiler {
    bundler: Arc<dyn Bundler>,
    loader: Arc<dyn ModuleLoader>,
    settings: CompilerSettings,
}

impl ScriptCompiler {
    /// Create a compiler backed by esbuild and node as named in `settings`.
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            bundler: Arc::new(EsbuildBundler::new(settings.esbuild.clone())),
            loader: Arc::new(NodeLoader::new(settings.node.clone())),
            settings,
        }
    }

    /// Create a compiler with explicit collaborators.
    pub fn with_collaborators(
        bundler: Arc<dyn Bundler>,
        loader: Arc<dyn ModuleLoader>,
        settings: CompilerSettings,
    ) -> Self {
        Self {
            bundler,
            loader,
            settings,
        }
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    async fn compile_script(&self, candidate: &ConfigCandidate) -> DotDirResult<CompiledConfig> {
        let dir = candidate.dir();
        artifact::ensure_ignore_rule(dir).await?;

        let started = Instant::now();
        let module = match self.settings.artifact_mode {
            ArtifactMode::File => {
                let guard = ArtifactGuard::new(artifact::artifact_path(dir));
                let output = self
                    .bundler
                    .bundle(&self.request(candidate, Some(guard.path())))
                    .await?;
                match output {
                    BundleOutput::Written => {
                        self.loader.load(guard.path(), &candidate.file_path).await
                    }
                    BundleOutput::Memory(bytes) => self.load_bytes(dir, &bytes, candidate).await,
                }
            }
            ArtifactMode::Memory => {
                match self.bundler.bundle(&self.request(candidate, None)).await? {
                    BundleOutput::Memory(bytes) => self.load_bytes(dir, &bytes, candidate).await,
                    BundleOutput::Written => Err(DotDirError::malformed(
                        &candidate.file_path,
                        "bundler wrote to disk when an in-memory bundle was requested",
                    )),
                }
            }
        }?;

        if !module.has_default {
            return Err(DotDirError::malformed(
                &candidate.file_path,
                "the module has no default export",
            ));
        }
        let config = into_object(module.value, &candidate.file_path)?;

        info!(
            file = %candidate.file_path.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "compiled config"
        );
        Ok(config)
    }

    fn request(&self, candidate: &ConfigCandidate, outfile: Option<&Path>) -> BundleRequest {
        BundleRequest {
            entry: candidate.file_path.clone(),
            work_dir: candidate.dir().to_path_buf(),
            target: self.settings.target.clone(),
            outfile: outfile.map(Path::to_path_buf),
        }
    }

    async fn load_bytes(
        &self,
        dir: &Path,
        bytes: &[u8],
        candidate: &ConfigCandidate,
    ) -> DotDirResult<LoadedModule> {
        let temp = artifact::materialize(dir, bytes)?;
        let result = self.loader.load(temp.path(), &candidate.file_path).await;
        artifact::discard(temp);
        result
    }
}

#[async_trait]
impl ConfigCompiler for ScriptCompiler {
    async fn compile(&self, candidate: &ConfigCandidate) -> DotDirResult<CompiledConfig> {
        if candidate.extension.is_data() {
            let bytes = tokio::fs::read(&candidate.file_path)
                .await
                .map_err(|e| DotDirError::io(&candidate.file_path, e))?;
            return parse_data(&candidate.file_path, &bytes);
        }
        self.compile_script(candidate).await
    }

    async fn compile_source(
        &self,
        candidate: &ConfigCandidate,
        source: &[u8],
    ) -> DotDirResult<CompiledConfig> {
        if candidate.extension.is_data() {
            return parse_data(&candidate.file_path, source);
        }
        self.compile_script(candidate).await
    }
}

/// Parse JSON config content. No compilation step is involved.
fn parse_data(path: &Path, bytes: &[u8]) -> DotDirResult<CompiledConfig> {
    debug!(file = %path.display(), "parsing data config");
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| DotDirError::malformed(path, format!("invalid JSON: {e}")))?;
    into_object(value, path)
}

fn into_object(value: serde_json::Value, path: &Path) -> DotDirResult<CompiledConfig> {
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(DotDirError::malformed(
            path,
            format!("the configuration must be an object, got {}", json_kind(&other)),
        )),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
