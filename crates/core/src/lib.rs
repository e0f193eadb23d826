//! # dd-core
//!
//! Dot directory discovery and configuration loading for dotdir.
//!
//! This crate provides:
//! - Resolution of the dot directory name from options or `package.json`
//! - Upward search for the `.<name>` directory
//! - Selection of the single `config.*` file inside it
//! - Compilation of script configs through esbuild and node
//! - A content-addressed cache keyed by the SHA-256 of the config file
//!
//! ## Modules
//!
//! - [`locate`]: Name resolution, upward search and file probing
//! - [`compiler`]: Bundler and loader adapters plus the default compiler
//! - [`cache`]: Content-addressed cache of compiled configurations
//! - [`config`]: Compiler settings and toolchain resolution
//! - [`engine`]: The lookup engine tying everything together
//! - [`error`]: Error taxonomy

pub mod cache;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod error;
pub mod locate;

pub use cache::{CacheKey, ContentCache};
pub use engine::{get_config, DotDir};
pub use error::{DotDirError, DotDirResult};
