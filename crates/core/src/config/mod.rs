//! Compiler settings loading and toolchain resolution.
//!
//! Settings come from [`CompilerSettings::default`] and are then overridden
//! by `DOTDIR_*` environment variables. Tool commands are resolved to
//! executables on demand.

pub mod loader;
pub mod toolchain;

pub use loader::{apply_overrides, load_settings};
pub use toolchain::resolve_binary;
