//! Temporary compiled artifacts and their ignore rule.
//!
//! Artifacts live beside the source, in the dot directory, so that relative
//! imports resolve the same way they would for the source. Every artifact
//! name starts with [`ARTIFACT_PREFIX`], which the dot directory's
//! `.gitignore` excludes.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{DotDirError, DotDirResult};

pub const ARTIFACT_PREFIX: &str = "config.build-";
pub const ARTIFACT_SUFFIX: &str = ".mjs";
pub const IGNORE_FILE: &str = ".gitignore";
pub const IGNORE_RULE: &str = "config.build-*";

/// A fresh, unique artifact path in `dir`:
/// `config.build-<unix millis>-<8 hex chars>.mjs`.
pub fn artifact_path(dir: &Path) -> PathBuf {
    let millis = chrono::Utc::now().timestamp_millis();
    let id = uuid::Uuid::new_v4().simple().to_string();
    dir.join(format!(
        "{ARTIFACT_PREFIX}{millis}-{}{ARTIFACT_SUFFIX}",
        &id[..8]
    ))
}

/// Make sure `<dir>/.gitignore` excludes artifacts.
///
/// The file is created if missing. An existing file gets the rule appended
/// once, keeping its other lines. Returns `true` if anything was written.
pub async fn ensure_ignore_rule(dir: &Path) -> DotDirResult<bool> {
    use tokio::io::AsyncWriteExt;

    let path = dir.join(IGNORE_FILE);
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await;

    match file {
        Ok(mut file) => {
            file.write_all(format!("{IGNORE_RULE}\n").as_bytes())
                .await
                .map_err(|e| DotDirError::io(&path, e))?;
            debug!(path = %path.display(), "created artifact ignore rule");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let existing = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| DotDirError::io(&path, e))?;
            if existing.lines().any(|line| line.trim() == IGNORE_RULE) {
                return Ok(false);
            }

            let separator = if existing.is_empty() || existing.ends_with('\n') {
                ""
            } else {
                "\n"
            };
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .open(&path)
                .await
                .map_err(|e| DotDirError::io(&path, e))?;
            file.write_all(format!("{separator}{IGNORE_RULE}\n").as_bytes())
                .await
                .map_err(|e| DotDirError::io(&path, e))?;
            debug!(path = %path.display(), "appended artifact ignore rule");
            Ok(true)
        }
        Err(e) => Err(DotDirError::io(&path, e)),
    }
}

/// Removes an artifact file when dropped.
///
/// Removal is best-effort: a missing file is fine, any other failure is
/// logged and swallowed so it cannot mask the error that ended the compile.
#[derive(Debug)]
pub struct ArtifactGuard {
    path: PathBuf,
}

impl ArtifactGuard {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "removed artifact"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove artifact"),
        }
    }
}

/// Write in-memory bundle bytes to a temporary artifact in `dir`.
///
/// The file is deleted when the returned handle is dropped or passed to
/// [`discard`].
pub fn materialize(dir: &Path, bytes: &[u8]) -> DotDirResult<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(ARTIFACT_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| DotDirError::io(dir, e))?;

    if let Err(e) = file.write_all(bytes).and_then(|()| file.flush()) {
        return Err(DotDirError::io(file.path(), e));
    }

    Ok(file)
}

/// Delete a materialized artifact, logging instead of failing.
pub fn discard(file: NamedTempFile) {
    let path = file.path().to_path_buf();
    if let Err(e) = file.close() {
        warn!(path = %path.display(), error = %e, "failed to remove artifact");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn artifacts_in(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(ARTIFACT_PREFIX))
            })
            .collect()
    }

    #[test]
    fn test_artifact_paths_are_unique_and_ignored() {
        let dir = tempdir().unwrap();
        let a = artifact_path(dir.path());
        let b = artifact_path(dir.path());

        assert_ne!(a, b);
        assert_eq!(a.parent(), Some(dir.path()));
        let name = a.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(ARTIFACT_PREFIX));
        assert!(name.ends_with(ARTIFACT_SUFFIX));
    }

    #[tokio::test]
    async fn test_ignore_rule_created_once() {
        let dir = tempdir().unwrap();

        assert!(ensure_ignore_rule(dir.path()).await.unwrap());
        let content = fs::read_to_string(dir.path().join(IGNORE_FILE)).unwrap();
        assert_eq!(content.trim(), IGNORE_RULE);

        assert!(!ensure_ignore_rule(dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_existing_ignore_file_gets_rule_appended_once() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(IGNORE_FILE), "secrets.json\n").unwrap();

        assert!(ensure_ignore_rule(dir.path()).await.unwrap());
        assert!(!ensure_ignore_rule(dir.path()).await.unwrap());

        let content = fs::read_to_string(dir.path().join(IGNORE_FILE)).unwrap();
        assert_eq!(content, format!("secrets.json\n{IGNORE_RULE}\n"));
    }

    #[tokio::test]
    async fn test_rule_appended_after_unterminated_last_line() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(IGNORE_FILE), "node_modules").unwrap();

        assert!(ensure_ignore_rule(dir.path()).await.unwrap());

        let content = fs::read_to_string(dir.path().join(IGNORE_FILE)).unwrap();
        assert_eq!(content, format!("node_modules\n{IGNORE_RULE}\n"));
    }

    #[tokio::test]
    async fn test_existing_rule_is_left_alone() {
        let dir = tempdir().unwrap();
        let original = format!("a.txt\n{IGNORE_RULE}\nb.txt\n");
        fs::write(dir.path().join(IGNORE_FILE), &original).unwrap();

        assert!(!ensure_ignore_rule(dir.path()).await.unwrap());
        assert_eq!(fs::read_to_string(dir.path().join(IGNORE_FILE)).unwrap(), original);
    }

    #[test]
    fn test_guard_removes_file() {
        let dir = tempdir().unwrap();
        let path = artifact_path(dir.path());
        fs::write(&path, "export default {}").unwrap();

        drop(ArtifactGuard::new(path.clone()));
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        drop(ArtifactGuard::new(artifact_path(dir.path())));
        assert!(artifacts_in(dir.path()).is_empty());
    }

    #[test]
    fn test_materialize_and_discard() {
        let dir = tempdir().unwrap();
        let file = materialize(dir.path(), b"export default { a: 1 };").unwrap();

        assert_eq!(artifacts_in(dir.path()).len(), 1);
        assert_eq!(
            fs::read_to_string(file.path()).unwrap(),
            "export default { a: 1 };"
        );

        discard(file);
        assert!(artifacts_in(dir.path()).is_empty());
    }
}
