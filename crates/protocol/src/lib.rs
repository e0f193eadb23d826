//! # dd-protocol
//!
//! Core protocol definitions and data models for dotdir.
//!
//! This crate defines the shared data structures used for:
//! - Lookup requests (`cwd`, `dirName`)
//! - Lookup responses (the loaded configuration plus location metadata)
//! - The fixed set of accepted configuration file extensions
//! - Compiler settings for script-like configuration sources
//!
//! ## Modules
//!
//! - [`extension_models`]: Accepted `config.*` extensions and their priority
//! - [`lookup_models`]: Find options, metadata and responses
//! - [`config_models`]: Compiler settings and artifact modes
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, serde_json and ts-rs
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other dotdir crates

pub mod config_models;
pub mod extension_models;
pub mod lookup_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use extension_models::*;
pub use lookup_models::*;
