//! Mock bundler and loader for testing.
//!
//! Neither touches esbuild or node. The bundler writes a placeholder
//! artifact exactly where a real one would go, so cleanup behaviour can be
//! asserted on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::compiler::base::{BundleOutput, BundleRequest, Bundler, LoadedModule, ModuleLoader};
use crate::error::{DotDirError, DotDirResult};

const PLACEHOLDER_ARTIFACT: &[u8] = b"export default {};\n";

#[derive(Clone)]
pub struct MockBundler {
    calls: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl MockBundler {
    pub fn success() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failure: None,
        }
    }

    /// A bundler that always fails with `diagnostic`.
    pub fn failing(diagnostic: impl Into<String>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failure: Some(diagnostic.into()),
        }
    }

    /// Number of `bundle` calls so far, shared across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bundler for MockBundler {
    async fn bundle(&self, request: &BundleRequest) -> DotDirResult<BundleOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(outfile) = &request.outfile {
            tokio::fs::write(outfile, PLACEHOLDER_ARTIFACT)
                .await
                .map_err(|e| DotDirError::io(outfile, e))?;
        }

        if let Some(diagnostic) = &self.failure {
            return Err(DotDirError::Compilation {
                file_path: request.entry.clone(),
                diagnostic: diagnostic.clone(),
            });
        }

        match request.outfile {
            Some(_) => Ok(BundleOutput::Written),
            None => Ok(BundleOutput::Memory(PLACEHOLDER_ARTIFACT.to_vec())),
        }
    }
}

/// What the mock loader does when asked to load an artifact.
#[derive(Clone)]
enum LoaderBehavior {
    /// Report the source file's content, parsed as JSON, as the default export.
    EchoSource,
    /// Return a fixed result.
    Fixed(LoadedModule),
    /// Fail as if the module threw.
    Throw(String),
}

#[derive(Clone)]
pub struct MockLoader {
    behavior: LoaderBehavior,
    loaded: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl MockLoader {
    fn with_behavior(behavior: LoaderBehavior) -> Self {
        Self {
            behavior,
            loaded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Treats the script source as JSON and exports it as the default.
    ///
    /// Lets tests change "script" configs by rewriting plain JSON.
    pub fn echo_source() -> Self {
        Self::with_behavior(LoaderBehavior::EchoSource)
    }

    /// Always exports `value` as the default.
    pub fn exporting(value: serde_json::Value) -> Self {
        Self::with_behavior(LoaderBehavior::Fixed(LoadedModule {
            has_default: true,
            value,
        }))
    }

    /// A module with no default export.
    pub fn without_default() -> Self {
        Self::with_behavior(LoaderBehavior::Fixed(LoadedModule {
            has_default: false,
            value: serde_json::Value::Null,
        }))
    }

    /// A module that throws while being evaluated.
    pub fn throwing(diagnostic: impl Into<String>) -> Self {
        Self::with_behavior(LoaderBehavior::Throw(diagnostic.into()))
    }

    /// Every artifact path handed to `load`, with whether it existed at that moment.
    pub fn loaded(&self) -> Vec<(PathBuf, bool)> {
        self.loaded
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ModuleLoader for MockLoader {
    async fn load(&self, artifact: &Path, source: &Path) -> DotDirResult<LoadedModule> {
        let existed = tokio::fs::try_exists(artifact).await.unwrap_or(false);
        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.push((artifact.to_path_buf(), existed));
        }

        match &self.behavior {
            LoaderBehavior::EchoSource => {
                let bytes = tokio::fs::read(source)
                    .await
                    .map_err(|e| DotDirError::io(source, e))?;
                let value = serde_json::from_slice(&bytes).map_err(|e| DotDirError::Evaluation {
                    file_path: source.to_path_buf(),
                    diagnostic: e.to_string(),
                })?;
                Ok(LoadedModule {
                    has_default: true,
                    value,
                })
            }
            LoaderBehavior::Fixed(module) => Ok(module.clone()),
            LoaderBehavior::Throw(diagnostic) => Err(DotDirError::Evaluation {
                file_path: source.to_path_buf(),
                diagnostic: diagnostic.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_bundler_writes_outfile_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let bundler = MockBundler::success();
        let outfile = dir.path().join("out.mjs");

        let output = bundler
            .bundle(&BundleRequest {
                entry: dir.path().join("config.ts"),
                work_dir: dir.path().to_path_buf(),
                target: "node18".to_string(),
                outfile: Some(outfile.clone()),
            })
            .await
            .unwrap();

        assert_eq!(output, BundleOutput::Written);
        assert!(outfile.exists());
        assert_eq!(bundler.clone().calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_loader_records_loads() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("a.mjs");
        std::fs::write(&artifact, "").unwrap();

        let loader = MockLoader::exporting(json!({"x": 1}));
        let module = loader.load(&artifact, Path::new("config.ts")).await.unwrap();

        assert_eq!(module.value, json!({"x": 1}));
        assert_eq!(loader.loaded(), vec![(artifact, true)]);
    }
}
