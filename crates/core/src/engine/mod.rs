//! Lookup engine.
//!
//! [`DotDir`] runs the full lookup: resolve the directory name, locate the
//! directory, pick the config file, then return the cached value or compile
//! a fresh one. Every stage fails fast; nothing is retried.

use dd_protocol::config_models::CompilerSettings;
use dd_protocol::lookup_models::{ConfigMeta, DotDirResponse, FindOptions};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheKey, ContentCache};
use crate::compiler::{ConfigCompiler, ScriptCompiler};
use crate::config::load_settings;
use crate::error::{DotDirError, DotDirResult};
use crate::locate::{
    probe_config_file, resolve_dir_name, DirectoryLocator, FileCheck, FsFileCheck,
    FsUpwardLocator,
};

/// Finds and loads a project's dot directory configuration.
///
/// A `DotDir` optionally owns a [`ContentCache`]. With a cache, repeated
/// lookups of unchanged content skip compilation; without one, every lookup
/// compiles. Separate instances never share a cache unless one is passed in
/// explicitly with [`DotDir::with_cache`].
///
/// # Example
///
/// ```rust,no_run
/// use dd_core::DotDir;
/// use dd_protocol::FindOptions;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dotdir = DotDir::new();
/// let response = dotdir.find(&FindOptions::new().with_dir_name("myapp")).await?;
/// println!("loaded {}", response.meta.file_path.display());
/// # Ok(())
/// # }
/// ```
pub struct DotDir {
    cache: Option<Arc<ContentCache>>,
    locator: Arc<dyn DirectoryLocator>,
    file_check: Arc<dyn FileCheck>,
    compiler: Arc<dyn ConfigCompiler>,
}

impl DotDir {
    /// A lookup engine with its own private cache.
    ///
    /// Compiler settings come from [`load_settings`].
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ContentCache::new()))
    }

    /// A lookup engine using `cache`, which may be shared with other instances.
    pub fn with_cache(cache: Arc<ContentCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::uncached()
        }
    }

    /// A lookup engine without a cache: every lookup compiles.
    pub fn uncached() -> Self {
        Self {
            cache: None,
            locator: Arc::new(FsUpwardLocator),
            file_check: Arc::new(FsFileCheck),
            compiler: Arc::new(ScriptCompiler::new(load_settings())),
        }
    }

    /// Use the default compiler with explicit settings.
    pub fn with_settings(self, settings: CompilerSettings) -> Self {
        self.with_compiler(Arc::new(ScriptCompiler::new(settings)))
    }

    /// Replace the compiler.
    pub fn with_compiler(mut self, compiler: Arc<dyn ConfigCompiler>) -> Self {
        self.compiler = compiler;
        self
    }

    /// Replace the upward directory search.
    pub fn with_locator(mut self, locator: Arc<dyn DirectoryLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Replace the file existence check used when probing for `config.*`.
    pub fn with_file_check(mut self, file_check: Arc<dyn FileCheck>) -> Self {
        self.file_check = file_check;
        self
    }

    /// The cache, if this instance has one.
    pub fn cache(&self) -> Option<&Arc<ContentCache>> {
        self.cache.as_ref()
    }

    /// Locate the dot directory and load its configuration.
    ///
    /// This is the main entry point. It:
    /// 1. Resolves the directory name (`options.dir_name` or `package.json`)
    /// 2. Searches upward from `options.cwd` for that directory
    /// 3. Picks the highest-priority `config.*` file inside it
    /// 4. Hashes the file's bytes
    /// 5. Returns the cached value for that hash, or compiles and caches it
    ///
    /// Metadata is assembled fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns the [`DotDirError`] of the first stage that failed.
    pub async fn find(&self, options: &FindOptions) -> DotDirResult<DotDirResponse> {
        let start = starting_directory(options.cwd.as_deref())?;
        let dir_name = resolve_dir_name(&start, options.dir_name.as_deref()).await?;
        debug!(start = %start.display(), %dir_name, "searching for dot directory");

        let dir_path = self.locator.locate(&start, &dir_name).await?;
        let candidate = probe_config_file(Arc::clone(&self.file_check), &dir_path).await?;

        let bytes = tokio::fs::read(&candidate.file_path)
            .await
            .map_err(|e| DotDirError::io(&candidate.file_path, e))?;
        let key = CacheKey::from_bytes(&bytes);

        let config = match &self.cache {
            Some(cache) => {
                let (config, hit) = cache
                    .get_or_compile(key.clone(), || {
                        self.compiler.compile_source(&candidate, &bytes)
                    })
                    .await?;
                debug!(%key, hit, "config cache");
                config
            }
            None => self.compiler.compile_source(&candidate, &bytes).await?,
        };

        Ok(DotDirResponse {
            config,
            meta: ConfigMeta {
                file_path: candidate.file_path,
                ext: candidate.extension,
                dir_name,
                dir_path,
            },
        })
    }
}

impl Default for DotDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless lookup: equivalent to `DotDir::uncached().find(options)`.
///
/// Nothing is cached between calls.
pub async fn get_config(options: &FindOptions) -> DotDirResult<DotDirResponse> {
    DotDir::uncached().find(options).await
}

/// Absolute, normalized starting directory: `cwd` if absolute, otherwise
/// joined onto the process working directory.
fn starting_directory(cwd: Option<&Path>) -> DotDirResult<PathBuf> {
    let start = match cwd {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        _ => {
            let current = std::env::current_dir().map_err(|e| DotDirError::io(".", e))?;
            match cwd {
                Some(relative) => current.join(relative),
                None => current,
            }
        }
    };
    Ok(normalize(&start))
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_cwd_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(starting_directory(Some(dir.path())).unwrap(), dir.path());
    }

    #[test]
    fn test_relative_cwd_is_joined_onto_current_dir() {
        let current = std::env::current_dir().unwrap();
        assert_eq!(
            starting_directory(Some(Path::new("sub/dir"))).unwrap(),
            current.join("sub/dir")
        );
        assert_eq!(starting_directory(None).unwrap(), current);
    }

    #[test]
    fn test_parent_components_are_folded() {
        let dir = tempfile::tempdir().unwrap();
        let messy = dir.path().join("b").join("..").join(".").join("x");

        assert_eq!(starting_directory(Some(&messy)).unwrap(), dir.path().join("x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/a/../../b/./c")), PathBuf::from("/b/c"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_instances_do_not_share_caches() {
        let a = DotDir::new();
        let b = DotDir::new();
        let (ca, cb) = (a.cache().unwrap(), b.cache().unwrap());
        assert!(!Arc::ptr_eq(ca, cb));

        let shared = Arc::new(ContentCache::new());
        let c = DotDir::with_cache(Arc::clone(&shared));
        assert!(Arc::ptr_eq(c.cache().unwrap(), &shared));

        assert!(DotDir::uncached().cache().is_none());
    }
}
