// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system adapter backed by the local disk.

use crate::ports::FileSystem;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads and writes real files.
///
/// Writes go to a temporary file in the target's directory which is then
/// renamed over the target, so a failed save never leaves a truncated file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Creates a new local file system adapter.
    pub fn new() -> Self {
        LocalFileSystem
    }
}

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        Ok(fs::metadata(path)?.len())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        // Write through symlinks instead of replacing them
        let resolved;
        let path = if path.exists() {
            resolved = fs::canonicalize(path)?;
            resolved.as_path()
        } else {
            path
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;

        // Keep the permissions of the file being replaced
        if let Ok(metadata) = fs::metadata(path) {
            tmp.as_file().set_permissions(metadata.permissions())?;
        }

        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
