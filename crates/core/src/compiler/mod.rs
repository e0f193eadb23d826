//! Configuration compilation.
//!
//! This module provides the `ConfigCompiler` trait, the `Bundler` and
//! `ModuleLoader` collaborator traits (Adapter Pattern), and the default
//! `ScriptCompiler` that ties them together.

pub mod adapters;
pub mod artifact;
pub mod base;
pub mod process;
pub mod script;

pub use adapters::{EsbuildBundler, MockBundler, MockLoader, NodeLoader};
pub use base::{BundleOutput, BundleRequest, Bundler, ConfigCompiler, LoadedModule, ModuleLoader};
pub use script::ScriptCompiler;
