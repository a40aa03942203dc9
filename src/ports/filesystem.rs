// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system port.
//!
//! Loaders never touch `std::fs` directly; they go through this trait so that
//! a store can be exercised against an in-memory file system.

use std::fmt;
use std::io;
use std::path::Path;

/// Byte-level access to configuration files.
///
/// # Examples
///
/// ```rust
/// use cfgstore::ports::FileSystem;
/// use std::io;
/// use std::path::Path;
///
/// #[derive(Debug)]
/// struct ReadOnly;
///
/// impl FileSystem for ReadOnly {
///     fn exists(&self, _path: &Path) -> bool {
///         true
///     }
///
///     fn file_size(&self, _path: &Path) -> io::Result<u64> {
///         Ok(2)
///     }
///
///     fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
///         Ok(b"{}".to_vec())
///     }
///
///     fn write(&self, _path: &Path, _contents: &[u8]) -> io::Result<()> {
///         Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
///     }
/// }
/// ```
pub trait FileSystem: Send + Sync + fmt::Debug {
    /// Returns true if a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the size of the file in bytes.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Reads the whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replaces the file's contents.
    ///
    /// Implementations must not leave a partially written file behind when
    /// they return an error.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}
