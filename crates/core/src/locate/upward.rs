//! Upward search for the dot directory.
//!
//! The search is a trait seam: the default [`FsUpwardLocator`] walks the
//! real filesystem, tests may substitute their own.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::error::DotDirError;

/// Outcome of a failed upward search.
///
/// "Not found" is an error like any other; there is no `Option` sentinel.
#[derive(Error, Debug)]
pub enum LocateError {
    /// No ancestor of `start` contains a directory called `dir_name`.
    #[error("no ancestor of {start} contains \"{dir_name}\"")]
    NotFound { dir_name: String, start: PathBuf },

    /// The filesystem failed while inspecting `path`.
    #[error("failed to inspect {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<LocateError> for DotDirError {
    fn from(error: LocateError) -> Self {
        match error {
            LocateError::NotFound { dir_name, start } => {
                DotDirError::DirectoryNotFound { dir_name, start }
            }
            LocateError::Io { path, source } => DotDirError::Io { path, source },
        }
    }
}

/// Finds the nearest ancestor directory containing a named subdirectory.
#[async_trait]
pub trait DirectoryLocator: Send + Sync {
    /// Return `<ancestor>/<dir_name>` for the nearest ancestor of `start`
    /// (`start` included) where that path is a directory.
    async fn locate(&self, start: &Path, dir_name: &str) -> Result<PathBuf, LocateError>;
}

/// [`DirectoryLocator`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsUpwardLocator;

#[async_trait]
impl DirectoryLocator for FsUpwardLocator {
    async fn locate(&self, start: &Path, dir_name: &str) -> Result<PathBuf, LocateError> {
        for ancestor in start.ancestors() {
            let candidate = ancestor.join(dir_name);
            match tokio::fs::metadata(&candidate).await {
                Ok(metadata) if metadata.is_dir() => {
                    debug!(path = %candidate.display(), "located dot directory");
                    return Ok(candidate);
                }
                Ok(_) => continue,
                Err(e) if is_absent(&e) => continue,
                Err(source) => {
                    return Err(LocateError::Io {
                        path: candidate,
                        source,
                    })
                }
            }
        }

        Err(LocateError::NotFound {
            dir_name: dir_name.to_string(),
            start: start.to_path_buf(),
        })
    }
}

/// Errors that mean "nothing is there" rather than "could not look".
pub(crate) fn is_absent(error: &std::io::Error) -> bool {
    matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_finds_directory_in_start() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".proj")).unwrap();

        let found = FsUpwardLocator.locate(dir.path(), ".proj").await.unwrap();
        assert_eq!(found, dir.path().join(".proj"));
    }

    #[tokio::test]
    async fn test_finds_nearest_ancestor() {
        let dir = tempdir().unwrap();
        let outer = dir.path();
        let inner = outer.join("a");
        let start = inner.join("b/c");
        fs::create_dir_all(outer.join(".proj")).unwrap();
        fs::create_dir_all(inner.join(".proj")).unwrap();
        fs::create_dir_all(&start).unwrap();

        let found = FsUpwardLocator.locate(&start, ".proj").await.unwrap();
        assert_eq!(found, inner.join(".proj"));
    }

    #[tokio::test]
    async fn test_regular_file_with_matching_name_is_skipped() {
        let dir = tempdir().unwrap();
        let start = dir.path().join("child");
        fs::create_dir_all(&start).unwrap();
        fs::write(start.join(".proj"), "not a directory").unwrap();
        fs::create_dir(dir.path().join(".proj")).unwrap();

        let found = FsUpwardLocator.locate(&start, ".proj").await.unwrap();
        assert_eq!(found, dir.path().join(".proj"));
    }

    #[tokio::test]
    async fn test_not_found_is_an_error() {
        let dir = tempdir().unwrap();
        let result = FsUpwardLocator
            .locate(dir.path(), ".dotdir-missing-9f2c")
            .await;

        match result {
            Err(LocateError::NotFound { dir_name, start }) => {
                assert_eq!(dir_name, ".dotdir-missing-9f2c");
                assert_eq!(start, dir.path());
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_not_found_maps_to_directory_not_found() {
        let error: DotDirError = LocateError::NotFound {
            dir_name: ".x".to_string(),
            start: PathBuf::from("/tmp"),
        }
        .into();
        assert!(matches!(error, DotDirError::DirectoryNotFound { .. }));
    }
}
