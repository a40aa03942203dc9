// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store layer.
//!
//! [`ConfigStore`] is the entry point applications use. It holds the decoded
//! configuration and drives a [`ConfigLoader`](crate::ports::ConfigLoader) to
//! move it to and from disk.

mod config_store;

pub use config_store::{ConfigStore, ConfigStoreBuilder};
