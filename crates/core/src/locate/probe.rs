//! Selection of the `config.*` file inside a dot directory.
//!
//! All five existence checks are started at once. Selection only happens
//! after every check has finished, so the winner depends on
//! [`ConfigExtension::PRIORITY`] and never on which check returns first.

use async_trait::async_trait;
use dd_protocol::extension_models::ConfigExtension;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::{DotDirError, DotDirResult};
use crate::locate::upward::is_absent;

/// The configuration source file chosen for a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigCandidate {
    pub file_path: PathBuf,
    pub extension: ConfigExtension,
}

impl ConfigCandidate {
    /// The directory holding the candidate (the dot directory).
    pub fn dir(&self) -> &Path {
        self.file_path.parent().unwrap_or(&self.file_path)
    }
}

/// Regular-file existence check.
#[async_trait]
pub trait FileCheck: Send + Sync {
    /// `Ok(true)` only for a regular file. Missing paths and directories are `Ok(false)`.
    async fn is_file(&self, path: &Path) -> std::io::Result<bool>;
}

/// [`FileCheck`] backed by `tokio::fs::metadata`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFileCheck;

#[async_trait]
impl FileCheck for FsFileCheck {
    async fn is_file(&self, path: &Path) -> std::io::Result<bool> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Find the highest-priority `config.*` file in `dir`.
///
/// # Errors
///
/// - [`DotDirError::ConfigFileNotFound`] if no accepted file exists
/// - [`DotDirError::Io`] if a check fails for a reason other than absence
pub async fn probe_config_file(
    check: Arc<dyn FileCheck>,
    dir: &Path,
) -> DotDirResult<ConfigCandidate> {
    let mut checks = JoinSet::new();
    for (index, extension) in ConfigExtension::PRIORITY.into_iter().enumerate() {
        let check = Arc::clone(&check);
        let file_path = dir.join(extension.file_name());
        checks.spawn(async move {
            let exists = check.is_file(&file_path).await;
            (index, file_path, exists)
        });
    }

    let mut found: Vec<Option<PathBuf>> = vec![None; ConfigExtension::PRIORITY.len()];
    while let Some(joined) = checks.join_next().await {
        let (index, file_path, exists) =
            joined.map_err(|e| DotDirError::io(dir, std::io::Error::other(e)))?;
        match exists {
            Ok(true) => found[index] = Some(file_path),
            Ok(false) => {}
            Err(source) => return Err(DotDirError::io(file_path, source)),
        }
    }

    let candidate = ConfigExtension::PRIORITY
        .into_iter()
        .zip(found)
        .find_map(|(extension, path)| {
            path.map(|file_path| ConfigCandidate {
                file_path,
                extension,
            })
        })
        .ok_or_else(|| DotDirError::ConfigFileNotFound {
            dir_path: dir.to_path_buf(),
            extensions: ConfigExtension::accepted_pattern(),
        })?;

    debug!(
        file = %candidate.file_path.display(),
        ext = %candidate.extension,
        "selected config file"
    );
    Ok(candidate)
}
