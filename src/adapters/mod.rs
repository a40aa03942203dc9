// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing loader and file system implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: one [`ConfigLoader`](crate::ports::ConfigLoader) per supported
//! format, the file systems they run on, and the registry that picks a loader
//! by format tag or file extension.

#[cfg(feature = "json")]
pub mod json_file;
pub mod local_fs;
pub mod memory_fs;
pub mod registry;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "json")]
pub use json_file::JsonLoader;
pub use local_fs::LocalFileSystem;
pub use memory_fs::MemoryFileSystem;
pub use registry::{LoaderFactory, LoaderRegistry};
#[cfg(feature = "yaml")]
pub use yaml_file::YamlLoader;
