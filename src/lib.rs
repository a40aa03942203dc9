// SPDX-License-Identifier: MIT OR Apache-2.0

//! A format-agnostic configuration store with pluggable file loaders.
//!
//! A [`ConfigStore`](store::ConfigStore) holds the top-level mapping of one
//! configuration file. Reading and writing that file is delegated to a
//! [`ConfigLoader`](ports::ConfigLoader) strategy, so the same store works with
//! JSON, YAML, or any format an application registers.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`ConfigValue`, `ConfigMap`, errors)
//! - **Ports**: Trait definitions (`ConfigLoader`, `FileSystem`)
//! - **Adapters**: JSON and YAML loaders, local and in-memory file systems,
//!   and the loader registry
//! - **Store**: The `ConfigStore` that validates and serves the data
//!
//! # Feature Flags
//!
//! - `json`: Enable the JSON loader (default)
//! - `yaml`: Enable the YAML loader (default)
//! - `cli`: Build the `cfgstore` command-line tool
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cfgstore::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let mut store = ConfigStore::open("config.yaml")?;
//!
//! let host = store.get("host").and_then(ConfigValue::as_str).unwrap_or("localhost");
//! println!("connecting to {}", host);
//!
//! store.set("last_run", "2024-01-01");
//! if !store.save()? {
//!     eprintln!("could not save config");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
#[cfg(feature = "cli")]
pub mod cli;
pub mod domain;
pub mod ports;
pub mod store;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{LoaderRegistry, LocalFileSystem, MemoryFileSystem};
    pub use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
    pub use crate::ports::{ConfigLoader, EncodeInput, FileSystem};
    pub use crate::store::{ConfigStore, ConfigStoreBuilder};

    // Re-export loaders based on feature flags
    #[cfg(feature = "json")]
    pub use crate::adapters::JsonLoader;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlLoader;
}
