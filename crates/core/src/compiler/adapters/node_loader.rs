//! Node adapter implementation: evaluates an artifact in a `node` subprocess.
//!
//! The artifact path goes in through [`ARTIFACT_ENV`]. The default export
//! comes back on stdout as one line prefixed with [`RESULT_MARKER`], so
//! anything the config itself prints is ignored.

use async_trait::async_trait;
use std::path::Path;

use crate::compiler::base::{LoadedModule, ModuleLoader};
use crate::compiler::process::{Invocation, ProcessExecutor};
use crate::config::resolve_binary;
use crate::error::{DotDirError, DotDirResult};

pub const ARTIFACT_ENV: &str = "DOTDIR_ARTIFACT";
pub const RESULT_MARKER: &str = "__DOTDIR_RESULT__";

const LOADER_SHIM: &str = r#"
import { pathToFileURL } from "node:url";
const mod = await import(pathToFileURL(process.env.DOTDIR_ARTIFACT).href);
const value = mod.default;
const hasDefault = value !== undefined && value !== null;
process.stdout.write("\n__DOTDIR_RESULT__" + JSON.stringify({ hasDefault, value: hasDefault ? value : null }) + "\n");
"#;

/// Loader that imports the artifact with `node` and reads back its default export.
pub struct NodeLoader {
    command: String,
}

impl NodeLoader {
    /// Create a new node loader.
    ///
    /// # Arguments
    ///
    /// * `command` - The node command, resolved on `PATH`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Extract the loader result from captured stdout.
    ///
    /// The last marker line wins.
    pub(crate) fn parse_output(stdout: &[u8], source: &Path) -> DotDirResult<LoadedModule> {
        let stdout = String::from_utf8_lossy(stdout);
        let payload = stdout
            .lines()
            .rev()
            .find_map(|line| line.strip_prefix(RESULT_MARKER))
            .ok_or_else(|| DotDirError::malformed(source, "loader produced no result"))?;

        serde_json::from_str(payload).map_err(|e| {
            DotDirError::malformed(source, format!("loader result is not valid JSON: {e}"))
        })
    }
}

#[async_trait]
impl ModuleLoader for NodeLoader {
    async fn load(&self, artifact: &Path, source: &Path) -> DotDirResult<LoadedModule> {
        let work_dir = artifact.parent().unwrap_or(Path::new("."));
        let program = resolve_binary(&self.command, None)?;

        let invocation = Invocation::new(program, work_dir)
            .arg("--input-type=module")
            .arg("-e")
            .arg(LOADER_SHIM)
            .env(ARTIFACT_ENV, artifact.display().to_string());

        let output = ProcessExecutor::run(&invocation).await?;
        if !output.success {
            return Err(DotDirError::Evaluation {
                file_path: source.to_path_buf(),
                diagnostic: output.stderr,
            });
        }

        Self::parse_output(&output.stdout, source)
    }
}
