//! Bundler and loader adapter implementations.

mod esbuild_bundler;
pub mod mock;
mod node_loader;

pub use esbuild_bundler::EsbuildBundler;
pub use mock::{MockBundler, MockLoader};
pub use node_loader::NodeLoader;
