// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! These traits define the seams of the store: the format strategy it
//! delegates to and the file system that strategy reads and writes through.
//! Adapters in the adapters layer implement them.

pub mod filesystem;
pub mod loader;

// Re-export commonly used types
pub use filesystem::FileSystem;
pub use loader::{ConfigLoader, EncodeInput, MAX_CONFIG_FILE_SIZE};
