//! Common subprocess executor for the bundler and loader adapters.
//!
//! Both external tools are run to completion with stdin closed; their full
//! stdout and stderr are captured for the caller to interpret.

use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{DotDirError, DotDirResult};

/// A single external command invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Runs external tools.
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Execute `invocation` and wait for it to exit.
    ///
    /// A non-zero exit is not an error here; callers decide what it means.
    ///
    /// # Errors
    ///
    /// Returns [`DotDirError::ToolUnavailable`] if the process cannot be spawned.
    pub async fn run(invocation: &Invocation) -> DotDirResult<ProcessOutput> {
        debug!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            cwd = %invocation.working_dir.display(),
            "spawning"
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);
        cmd.current_dir(&invocation.working_dir);
        cmd.envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let output = cmd
            .output()
            .await
            .map_err(|source| DotDirError::ToolUnavailable {
                tool: invocation.program.display().to_string(),
                source,
            })?;

        debug!(
            program = %invocation.program.display(),
            code = ?output.status.code(),
            "process exited"
        );

        Ok(ProcessOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
