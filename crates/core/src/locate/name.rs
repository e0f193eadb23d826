//! Dot directory name resolution.

use crate::error::{DotDirError, DotDirResult};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// File read for the project name when no explicit name is given.
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Deserialize)]
struct Manifest {
    name: Option<serde_json::Value>,
}

/// Resolve the dot directory name for a lookup.
///
/// A non-empty explicit `dir_name` wins and is returned as `.dir_name`.
/// Otherwise the `name` field of `<start>/package.json` is used. The manifest
/// is only read from `start` itself, never from its ancestors.
///
/// # Errors
///
/// Returns [`DotDirError::NameResolution`] if the manifest is missing,
/// unreadable, not JSON, or has no non-empty string `name`.
pub async fn resolve_dir_name(start: &Path, dir_name: Option<&str>) -> DotDirResult<String> {
    if let Some(name) = dir_name.filter(|name| !name.is_empty()) {
        return Ok(format!(".{name}"));
    }

    let manifest_path = start.join(MANIFEST_FILE);
    let failure = |reason: String| DotDirError::NameResolution {
        manifest: manifest_path.clone(),
        reason,
    };

    let content = tokio::fs::read(&manifest_path)
        .await
        .map_err(|e| failure(format!("failed to read manifest: {e}")))?;

    let manifest: Manifest = serde_json::from_slice(&content)
        .map_err(|e| failure(format!("manifest is not valid JSON: {e}")))?;

    let name = match manifest.name {
        Some(serde_json::Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err(failure("located the manifest but no name was found".to_string())),
    };

    debug!(manifest = %manifest_path.display(), %name, "derived dot directory name");
    Ok(format!(".{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_explicit_name_is_prefixed() {
        let dir = tempdir().unwrap();
        let name = resolve_dir_name(dir.path(), Some("myproj")).await.unwrap();
        assert_eq!(name, ".myproj");
    }

    #[tokio::test]
    async fn test_empty_explicit_name_falls_back_to_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"name": "myproj"}"#).unwrap();

        let name = resolve_dir_name(dir.path(), Some("")).await.unwrap();
        assert_eq!(name, ".myproj");
    }

    #[tokio::test]
    async fn test_empty_explicit_name_without_manifest_fails() {
        let dir = tempdir().unwrap();

        let result = resolve_dir_name(dir.path(), Some("")).await;
        assert!(matches!(result, Err(DotDirError::NameResolution { .. })));
    }

    #[tokio::test]
    async fn test_explicit_name_skips_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "not json").unwrap();

        let name = resolve_dir_name(dir.path(), Some("override")).await.unwrap();
        assert_eq!(name, ".override");
    }

    #[tokio::test]
    async fn test_name_from_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"name":"my-app","version":"1.0.0"}"#,
        )
        .unwrap();

        let name = resolve_dir_name(dir.path(), None).await.unwrap();
        assert_eq!(name, ".my-app");
    }

    #[tokio::test]
    async fn test_missing_manifest_fails() {
        let dir = tempdir().unwrap();
        let result = resolve_dir_name(dir.path(), None).await;

        if let Err(DotDirError::NameResolution { manifest, .. }) = result {
            assert!(manifest.ends_with(MANIFEST_FILE));
        } else {
            panic!("Expected NameResolution error");
        }
    }

    #[tokio::test]
    async fn test_manifest_is_not_searched_upward() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":"parent"}"#).unwrap();
        let child = dir.path().join("child");
        fs::create_dir(&child).unwrap();

        let result = resolve_dir_name(&child, None).await;
        assert!(matches!(result, Err(DotDirError::NameResolution { .. })));
    }

    #[tokio::test]
    async fn test_manifest_without_name_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), r#"{"version":"1.0.0"}"#).unwrap();

        let result = resolve_dir_name(dir.path(), None).await;
        assert!(matches!(result, Err(DotDirError::NameResolution { .. })));
    }

    #[tokio::test]
    async fn test_manifest_with_empty_or_non_string_name_fails() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":""}"#).unwrap();
        assert!(resolve_dir_name(dir.path(), None).await.is_err());

        fs::write(dir.path().join(MANIFEST_FILE), r#"{"name":42}"#).unwrap();
        assert!(resolve_dir_name(dir.path(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_manifest_json_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "{ name: ").unwrap();

        let result = resolve_dir_name(dir.path(), None).await;
        if let Err(DotDirError::NameResolution { reason, .. }) = result {
            assert!(reason.contains("not valid JSON"));
        } else {
            panic!("Expected NameResolution error");
        }
    }
}
