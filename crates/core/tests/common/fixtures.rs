//! Test fixtures for creating project trees with dot directories.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary project root containing `.<dir_name>/<file_name>`.
///
/// Returns a TempDir that must be kept alive for the test duration.
pub fn create_project(dir_name: &str, file_name: &str, contents: &str) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    write_config(temp_dir.path(), dir_name, file_name, contents)?;
    Ok(temp_dir)
}

/// Write `<root>/.<dir_name>/<file_name>`, creating the dot directory if needed.
pub fn write_config(
    root: &Path,
    dir_name: &str,
    file_name: &str,
    contents: &str,
) -> std::io::Result<PathBuf> {
    let dot_dir = root.join(format!(".{dir_name}"));
    std::fs::create_dir_all(&dot_dir)?;

    let path = dot_dir.join(file_name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

/// Create (and return) a nested directory below `root`, e.g. `"a/b/c"`.
pub fn nested_dir(root: &Path, relative: &str) -> std::io::Result<PathBuf> {
    let path = root.join(relative);
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Write a `package.json` with the given `name` into `dir`.
#[allow(dead_code)]
pub fn write_manifest(dir: &Path, name: &str) -> std::io::Result<()> {
    let manifest = serde_json::json!({ "name": name, "version": "1.0.0" });
    std::fs::write(dir.join("package.json"), manifest.to_string())
}

/// Names of the entries directly inside `dir`, sorted.
#[allow(dead_code)]
pub fn dir_entries(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
