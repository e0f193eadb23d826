//! Common test utilities shared by the integration tests.
//!
//! This module provides:
//! - Project tree fixtures
//! - A lookup engine wired to the mock bundler and loader

pub mod fixtures;

pub use fixtures::*;

use dd_core::compiler::{MockBundler, MockLoader, ScriptCompiler};
use dd_core::{ContentCache, DotDir};
use dd_protocol::CompilerSettings;
use std::sync::Arc;

/// A cached lookup engine whose compiler never spawns esbuild or node.
///
/// Returns the bundler so tests can count compilations.
#[allow(dead_code)]
pub fn mock_dotdir(loader: MockLoader) -> (DotDir, MockBundler, Arc<ContentCache>) {
    let bundler = MockBundler::success();
    let cache = Arc::new(ContentCache::new());
    let dotdir = DotDir::with_cache(Arc::clone(&cache)).with_compiler(mock_compiler(&bundler, loader));
    (dotdir, bundler, cache)
}

/// A [`ScriptCompiler`] around `bundler` and `loader` with default settings.
#[allow(dead_code)]
pub fn mock_compiler(bundler: &MockBundler, loader: MockLoader) -> Arc<ScriptCompiler> {
    Arc::new(ScriptCompiler::with_collaborators(
        Arc::new(bundler.clone()),
        Arc::new(loader),
        CompilerSettings::default(),
    ))
}
