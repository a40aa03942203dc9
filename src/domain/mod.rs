// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module defines the format-neutral value model and the error taxonomy.
//! It is independent of any file format or file system.

pub mod config_value;
pub mod errors;

// Re-export commonly used types
pub use config_value::{ConfigMap, ConfigValue};
pub use errors::{ConfigError, Result};
