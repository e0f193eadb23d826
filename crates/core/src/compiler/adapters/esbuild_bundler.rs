//! esbuild adapter implementation using the esbuild CLI subprocess.

use async_trait::async_trait;
use tracing::debug;

use crate::compiler::base::{BundleOutput, BundleRequest, Bundler};
use crate::compiler::process::{Invocation, ProcessExecutor};
use crate::config::resolve_binary;
use crate::error::{DotDirError, DotDirResult};

/// Lets bundled CommonJS dependencies call `require` inside the ESM output.
const REQUIRE_BANNER: &str = "import { createRequire as __dotdirCreateRequire } from 'node:module'; \
     const require = __dotdirCreateRequire(import.meta.url);";

/// Bundler that spawns `esbuild` and produces a single ES module.
///
/// Node built-ins (`node:*`) stay external; everything else the config
/// imports is inlined so the artifact can be evaluated on its own.
pub struct EsbuildBundler {
    command: String,
}

impl EsbuildBundler {
    /// Create a new esbuild bundler.
    ///
    /// # Arguments
    ///
    /// * `command` - The esbuild command, resolved on `PATH` or in `node_modules/.bin`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn build_args(request: &BundleRequest) -> Vec<String> {
        let mut args = vec![
            request.entry.display().to_string(),
            "--bundle".to_string(),
            "--platform=node".to_string(),
            "--format=esm".to_string(),
            format!("--target={}", request.target),
            "--external:node:*".to_string(),
            "--log-level=error".to_string(),
            format!("--banner:js={REQUIRE_BANNER}"),
        ];
        if let Some(outfile) = &request.outfile {
            args.push(format!("--outfile={}", outfile.display()));
        }
        args
    }
}

#[async_trait]
impl Bundler for EsbuildBundler {
    async fn bundle(&self, request: &BundleRequest) -> DotDirResult<BundleOutput> {
        let program = resolve_binary(&self.command, Some(&request.work_dir))?;

        let mut invocation = Invocation::new(program, request.work_dir.clone());
        invocation.args = Self::build_args(request);

        let output = ProcessExecutor::run(&invocation).await?;
        if !output.success {
            return Err(DotDirError::Compilation {
                file_path: request.entry.clone(),
                diagnostic: output.stderr,
            });
        }

        debug!(entry = %request.entry.display(), "bundled config");
        match request.outfile {
            Some(_) => Ok(BundleOutput::Written),
            None => Ok(BundleOutput::Memory(output.stdout)),
        }
    }
}
