//! Resolution of the bundler and loader executables.

use crate::error::{DotDirError, DotDirResult};
use std::path::{Path, PathBuf};

/// Resolve a tool command to an executable path.
///
/// Checks in the following order:
/// 1. `command` itself, via `PATH` lookup (or as a path if it contains a separator)
/// 2. `node_modules/.bin/<command>` in `project_root` and each of its ancestors
///
/// # Errors
///
/// Returns [`DotDirError::ToolUnavailable`] when neither location yields an executable.
pub fn resolve_binary(command: &str, project_root: Option<&Path>) -> DotDirResult<PathBuf> {
    if let Ok(path) = which::which(command) {
        return Ok(path);
    }

    if let Some(root) = project_root {
        for dir in root.ancestors() {
            let candidate = dir.join("node_modules").join(".bin").join(command);
            if let Ok(path) = which::which(&candidate) {
                return Ok(path);
            }
        }
    }

    Err(DotDirError::ToolUnavailable {
        tool: command.to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("'{command}' not found on PATH or in node_modules/.bin"),
        ),
    })
}
