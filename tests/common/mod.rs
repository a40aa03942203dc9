// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests.

use cfgstore::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use cfgstore::ports::{ConfigLoader, FileSystem};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A `key=value` line format used to check that the store accepts any loader.
///
/// Values are always strings; blank lines and lines starting with `#` are
/// skipped.
#[derive(Debug)]
pub struct PropertiesLoader {
    fs: Arc<dyn FileSystem>,
    path: Option<PathBuf>,
}

impl PropertiesLoader {
    /// Creates a loader on top of the given file system.
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs, path: None }
    }
}

impl ConfigLoader for PropertiesLoader {
    fn format_name(&self) -> &str {
        "Properties"
    }

    fn extensions(&self) -> &[&str] {
        &["properties"]
    }

    fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn remembered_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn remember_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    fn parse(&self, content: &str) -> Result<ConfigValue> {
        let mut map = ConfigMap::new();
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Decode {
                format: "Properties".to_string(),
                message: format!("expected key=value, found '{}'", line),
                source: None,
            })?;
            map.insert(key.trim().to_string(), ConfigValue::from(value.trim()));
        }
        Ok(ConfigValue::Mapping(map))
    }

    fn render(&self, data: &ConfigMap) -> Result<String> {
        Ok(data
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect())
    }
}

/// Writes `content` to `name` inside a fresh temporary directory.
///
/// The directory is removed when the returned guard is dropped.
pub fn temp_config(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write config file");
    (dir, path)
}
