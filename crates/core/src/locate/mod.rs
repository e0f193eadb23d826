//! Dot directory discovery.
//!
//! Three steps, each usable on its own:
//! - [`name`]: derive the dot directory name (explicit or from `package.json`)
//! - [`upward`]: walk ancestors to find that directory
//! - [`probe`]: pick the single `config.*` file inside it

pub mod name;
pub mod probe;
pub mod upward;

pub use name::resolve_dir_name;
pub use probe::{probe_config_file, ConfigCandidate, FileCheck, FsFileCheck};
pub use upward::{DirectoryLocator, FsUpwardLocator, LocateError};
