//! Content-addressed cache of compiled configurations.
//!
//! Entries are keyed by a SHA-256 digest of the raw source bytes, so the
//! same bytes at two paths share one entry, and one changed byte at the same
//! path is a miss. Entries are never evicted.

use dd_protocol::lookup_models::CompiledConfig;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Lowercase hex SHA-256 of a configuration file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Hash raw file content.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory map from content hash to compiled configuration.
///
/// Safe to share across concurrent lookups through `Arc`. Each key owns a
/// `OnceCell`, so concurrent requests for the same content wait on a single
/// compilation instead of starting their own.
#[derive(Default)]
pub struct ContentCache {
    /// Per-key cells, created on first request for the key.
    ///
    /// The outer lock is only held to fetch or insert a cell, never across
    /// a compilation.
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<CompiledConfig>>>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of the cached value for `key`, if one has been stored.
    pub async fn get(&self, key: &CacheKey) -> Option<CompiledConfig> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Store `value` under `key`.
    ///
    /// Entries are immutable: if `key` already holds a value, the existing
    /// value is kept.
    pub async fn put(&self, key: CacheKey, value: CompiledConfig) {
        let cell = self.cell(key).await;
        let _ = cell.set(value);
    }

    /// Return the cached value for `key`, running `compile` on a miss.
    ///
    /// Concurrent callers with the same key share one `compile` run. If it
    /// fails, nothing is stored and the next caller compiles again.
    ///
    /// The returned `bool` is `true` on a cache hit.
    pub async fn get_or_compile<F, Fut, E>(
        &self,
        key: CacheKey,
        compile: F,
    ) -> Result<(CompiledConfig, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CompiledConfig, E>>,
    {
        let cell = self.cell(key.clone()).await;
        if let Some(value) = cell.get() {
            return Ok((value.clone(), true));
        }

        let mut compiled_here = false;
        let result = cell
            .get_or_try_init(|| {
                compiled_here = true;
                compile()
            })
            .await;
        match result {
            Ok(value) => Ok((value.clone(), !compiled_here)),
            Err(e) => {
                self.forget_empty(&key, &cell).await;
                Err(e)
            }
        }
    }

    /// Number of stored values.
    pub async fn len(&self) -> usize {
        let entries = self.entries.lock().await;
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// Drop `key` if it still maps to `cell` and nothing was stored in it.
    async fn forget_empty(&self, key: &CacheKey, cell: &Arc<OnceCell<CompiledConfig>>) {
        let mut entries = self.entries.lock().await;
        let stale = entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, cell) && !current.initialized());
        if stale {
            entries.remove(key);
        }
    }

    async fn cell(&self, key: CacheKey) -> Arc<OnceCell<CompiledConfig>> {
        let mut entries = self.entries.lock().await;
        Arc::clone(entries.entry(key).or_default())
    }
}

impl fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache").finish_non_exhaustive()
    }
}
