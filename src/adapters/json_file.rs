// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file loader.
//!
//! Decoding is strict JSON via `serde_json`. Encoding is pretty-printed with
//! 4-space indentation and keeps keys in insertion order.

use crate::adapters::LocalFileSystem;
use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ConfigLoader, FileSystem};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loader for JSON configuration files.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::{JsonLoader, MemoryFileSystem};
/// use cfgstore::ports::ConfigLoader;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let fs = Arc::new(MemoryFileSystem::new().with_file("config.json", r#"{"key": "value"}"#));
/// let mut loader = JsonLoader::with_file_system(fs);
/// let value = loader.decode(Some(Path::new("config.json"))).unwrap();
/// assert_eq!(value.as_mapping().unwrap()["key"], "value");
/// ```
#[derive(Debug, Clone)]
pub struct JsonLoader {
    /// Where files are read from and written to
    fs: Arc<dyn FileSystem>,
    /// Last path resolved by this loader
    file_path: Option<PathBuf>,
}

impl JsonLoader {
    /// Creates a JSON loader that works on the local disk.
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(LocalFileSystem::new()))
    }

    /// Creates a JSON loader on top of the given file system.
    pub fn with_file_system(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            file_path: None,
        }
    }

    /// Sets the path used when later calls omit one.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

impl Default for JsonLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for JsonLoader {
    fn format_name(&self) -> &str {
        "JSON"
    }

    fn extensions(&self) -> &[&str] {
        &["json"]
    }

    fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    fn remembered_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn remember_path(&mut self, path: PathBuf) {
        self.file_path = Some(path);
    }

    fn parse(&self, content: &str) -> Result<ConfigValue> {
        serde_json::from_str(content).map_err(|e| ConfigError::decode(self.format_name(), e))
    }

    fn render(&self, data: &ConfigMap) -> Result<String> {
        // serde_json writes NaN and infinities as null
        for (key, value) in data {
            if let Some(path) = non_finite_path(value, key) {
                return Err(ConfigError::Encode {
                    format: self.format_name().to_string(),
                    message: format!("'{}' holds a non-finite number", path),
                    source: None,
                });
            }
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut serializer)
            .map_err(|e| ConfigError::encode(self.format_name(), e))?;
        String::from_utf8(buf).map_err(|e| ConfigError::encode(self.format_name(), e))
    }
}

/// Returns the dotted path of the first NaN or infinite float under `value`.
fn non_finite_path(value: &ConfigValue, path: &str) -> Option<String> {
    match value {
        ConfigValue::Float(f) if !f.is_finite() => Some(path.to_string()),
        ConfigValue::Sequence(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| non_finite_path(item, &format!("{}[{}]", path, i))),
        ConfigValue::Mapping(map) => map
            .iter()
            .find_map(|(key, item)| non_finite_path(item, &format!("{}.{}", path, key))),
        _ => None,
    }
}
