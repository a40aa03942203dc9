// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory file system adapter.
//!
//! Useful for tests: files live in a map, and reads or writes can be made to
//! fail on demand to simulate permission errors.

use crate::ports::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// A file system that keeps files in memory.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::MemoryFileSystem;
/// use cfgstore::ports::FileSystem;
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new().with_file("config.json", r#"{"key": "value"}"#);
/// assert!(fs.exists(Path::new("config.json")));
///
/// fs.fail_writes(true);
/// assert!(fs.write(Path::new("config.json"), b"{}").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, builder style.
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        if let Ok(mut files) = self.files.write() {
            files.insert(path.into(), contents.into());
        }
    }

    /// Removes a file, returning its contents.
    pub fn remove(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files
            .write()
            .ok()
            .and_then(|mut files| files.remove(path.as_ref()))
    }

    /// Returns a file's contents as UTF-8 text.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.read().ok()?;
        let bytes = files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// Makes every subsequent write fail with `PermissionDenied`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent read fail with `PermissionDenied`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied")
    }

    fn poisoned() -> io::Error {
        io::Error::new(io::ErrorKind::Other, "memory file system lock poisoned")
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files
            .read()
            .map(|files| files.contains_key(path))
            .unwrap_or(false)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files
            .get(path)
            .map(|bytes| bytes.len() as u64)
            .ok_or_else(|| Self::not_found(path))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::denied());
        }
        let files = self.files.read().map_err(|_| Self::poisoned())?;
        files.get(path).cloned().ok_or_else(|| Self::not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::denied());
        }
        let mut files = self.files.write().map_err(|_| Self::poisoned())?;
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
