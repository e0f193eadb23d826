//! Error types for dot directory lookups.
//!
//! Every stage of a lookup fails fast with exactly one of these variants,
//! so callers can tell which stage failed without parsing messages.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while resolving a configuration.
#[derive(Error, Debug)]
pub enum DotDirError {
    /// No explicit directory name was given and none could be read from the manifest.
    #[error(
        "Could not resolve the dot directory name from {manifest}: {reason}. \
         Pass `dir_name` explicitly."
    )]
    NameResolution { manifest: PathBuf, reason: String },

    /// No ancestor of the starting directory contains the target directory.
    #[error("Could not locate the \"{dir_name}\" directory from {start}")]
    DirectoryNotFound { dir_name: String, start: PathBuf },

    /// The directory exists but holds none of the accepted config files.
    #[error("Could not locate a '{extensions}' file within {dir_path}. Please ensure one exists")]
    ConfigFileNotFound { dir_path: PathBuf, extensions: String },

    /// The bundler rejected the configuration source.
    #[error("Failed to compile {file_path}:\n{diagnostic}")]
    Compilation {
        file_path: PathBuf,
        diagnostic: String,
    },

    /// The compiled artifact threw while it was being evaluated.
    #[error("Failed to evaluate compiled config for {file_path}:\n{diagnostic}")]
    Evaluation {
        file_path: PathBuf,
        diagnostic: String,
    },

    /// The configuration produced no usable default export.
    #[error("Malformed configuration file {file_path}: {reason}")]
    MalformedConfig { file_path: PathBuf, reason: String },

    /// An external tool could not be started.
    #[error("Failed to run '{tool}': {source}")]
    ToolUnavailable {
        tool: String,
        source: std::io::Error,
    },

    /// Any other filesystem failure.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl DotDirError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn malformed(file_path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::MalformedConfig {
            file_path: file_path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with DotDirError.
pub type DotDirResult<T> = Result<T, DotDirError>;
