//! Compiler settings loader.
//!
//! # Load Order
//!
//! 1. Default values ([`CompilerSettings::default`])
//! 2. Environment variables:
//!    - `DOTDIR_ESBUILD`: bundler command
//!    - `DOTDIR_NODE`: loader command
//!    - `DOTDIR_TARGET`: bundler target (e.g. `node20`)
//!    - `DOTDIR_ARTIFACT_MODE`: `file` or `memory`
//!
//! Each layer overrides the previous. Empty values are ignored.

use dd_protocol::config_models::{ArtifactMode, CompilerSettings};
use tracing::{debug, warn};

pub const ENV_ESBUILD: &str = "DOTDIR_ESBUILD";
pub const ENV_NODE: &str = "DOTDIR_NODE";
pub const ENV_TARGET: &str = "DOTDIR_TARGET";
pub const ENV_ARTIFACT_MODE: &str = "DOTDIR_ARTIFACT_MODE";

/// Loads compiler settings from defaults plus the process environment.
///
/// # Example
///
/// ```rust,no_run
/// use dd_core::config::load_settings;
///
/// let settings = load_settings();
/// println!("bundling for {}", settings.target);
/// ```
pub fn load_settings() -> CompilerSettings {
    apply_overrides(CompilerSettings::default(), |key| std::env::var(key).ok())
}

/// Applies `DOTDIR_*` overrides read through `lookup` on top of `settings`.
///
/// `lookup` is a parameter so tests can supply variables without touching
/// the process environment.
pub fn apply_overrides<F>(mut settings: CompilerSettings, lookup: F) -> CompilerSettings
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(esbuild) = non_empty(ENV_ESBUILD) {
        debug!(%esbuild, "bundler overridden from environment");
        settings.esbuild = esbuild;
    }
    if let Some(node) = non_empty(ENV_NODE) {
        debug!(%node, "loader overridden from environment");
        settings.node = node;
    }
    if let Some(target) = non_empty(ENV_TARGET) {
        settings.target = target;
    }
    if let Some(mode) = non_empty(ENV_ARTIFACT_MODE) {
        match ArtifactMode::parse(&mode) {
            Some(parsed) => settings.artifact_mode = parsed,
            None => warn!(
                value = %mode,
                "ignoring {ENV_ARTIFACT_MODE}: expected 'file' or 'memory'"
            ),
        }
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let settings = apply_overrides(CompilerSettings::default(), lookup_from(&[]));
        assert_eq!(settings, CompilerSettings::default());
    }

    #[test]
    fn test_all_overrides_applied() {
        let settings = apply_overrides(
            CompilerSettings::default(),
            lookup_from(&[
                (ENV_ESBUILD, "/opt/bin/esbuild"),
                (ENV_NODE, "/opt/bin/node"),
                (ENV_TARGET, "node20"),
                (ENV_ARTIFACT_MODE, "memory"),
            ]),
        );

        assert_eq!(settings.esbuild, "/opt/bin/esbuild");
        assert_eq!(settings.node, "/opt/bin/node");
        assert_eq!(settings.target, "node20");
        assert_eq!(settings.artifact_mode, ArtifactMode::Memory);
    }

    #[test]
    fn test_empty_and_invalid_values_ignored() {
        let settings = apply_overrides(
            CompilerSettings::default(),
            lookup_from(&[(ENV_NODE, "  "), (ENV_ARTIFACT_MODE, "tape")]),
        );

        assert_eq!(settings.node, "node");
        assert_eq!(settings.artifact_mode, ArtifactMode::File);
    }
}
