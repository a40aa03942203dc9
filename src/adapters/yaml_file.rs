// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file loader.
//!
//! Decoding goes through `serde_yaml` into [`ConfigValue`], which only accepts
//! plain scalars, sequences and string-keyed mappings; tagged values are
//! rejected. Encoding is block style with 4-space indentation and keeps keys
//! in insertion order.

use crate::adapters::LocalFileSystem;
use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ConfigLoader, FileSystem};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Indentation step for nested blocks.
const INDENT: usize = 4;

/// Loader for YAML configuration files.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::YamlLoader;
/// use cfgstore::ports::ConfigLoader;
///
/// let loader = YamlLoader::new();
/// let value = loader.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// let database = value.as_mapping().unwrap()["database"].as_mapping().unwrap();
/// assert_eq!(database["host"], "localhost");
/// ```
#[derive(Debug, Clone)]
pub struct YamlLoader {
    /// Where files are read from and written to
    fs: Arc<dyn FileSystem>,
    /// Last path resolved by this loader
    file_path: Option<PathBuf>,
}

impl YamlLoader {
    /// Creates a YAML loader that works on the local disk.
    pub fn new() -> Self {
        Self::with_file_system(Arc::new(LocalFileSystem::new()))
    }

    /// Creates a YAML loader on top of the given file system.
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

    /// Renders a scalar (or an empty collection) on a single line.
    fn scalar(&self, value: &ConfigValue) -> Result<String> {
        match value {
            ConfigValue::Sequence(seq) if seq.is_empty() => return Ok("[]".to_string()),
            ConfigValue::Mapping(map) if map.is_empty() => return Ok("{}".to_string()),
            _ => {}
        }

        let text =
            serde_yaml::to_string(value).map_err(|e| ConfigError::encode(self.format_name(), e))?;
        let text = text.trim_end_matches('\n');

        // Block scalars and raw line breaks cannot sit on one line after a
        // key or dash; an escaped double-quoted scalar can.
        if let ConfigValue::String(s) = value {
            if text.starts_with(['|', '>']) || s.contains(Self::is_line_break) {
                return Ok(Self::double_quoted(s));
            }
        }
        Ok(text.to_string())
    }

    fn is_line_break(c: char) -> bool {
        matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
    }

    /// Writes `s` as a YAML double-quoted scalar, escaping line breaks and
    /// characters outside the printable set.
    fn double_quoted(s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control()
                    || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}') =>
                {
                    out.push_str(&format!("\\u{:04X}", u32::from(c)));
                }
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    /// Writes `value` in block style at `indent`.
    ///
    /// With `inline_first` the first line continues the current line (after a
    /// sequence dash) instead of starting with indentation.
    fn write_block(
        &self,
        value: &ConfigValue,
        indent: usize,
        inline_first: bool,
        out: &mut String,
    ) -> Result<()> {
        match value {
            ConfigValue::Mapping(map) if !map.is_empty() => {
                self.write_mapping(map, indent, inline_first, out)
            }
            ConfigValue::Sequence(seq) if !seq.is_empty() => {
                for (i, item) in seq.iter().enumerate() {
                    if i > 0 || !inline_first {
                        out.push_str(&" ".repeat(indent));
                    }
                    out.push('-');
                    if Self::is_nested(item) {
                        out.push_str(&" ".repeat(INDENT - 1));
                        self.write_block(item, indent + INDENT, true, out)?;
                    } else {
                        out.push(' ');
                        out.push_str(&self.scalar(item)?);
                        out.push('\n');
                    }
                }
                Ok(())
            }
            scalar => {
                if !inline_first {
                    out.push_str(&" ".repeat(indent));
                }
                out.push_str(&self.scalar(scalar)?);
                out.push('\n');
                Ok(())
            }
        }
    }

    fn write_mapping(
        &self,
        map: &ConfigMap,
        indent: usize,
        inline_first: bool,
        out: &mut String,
    ) -> Result<()> {
        if map.is_empty() {
            out.push_str("{}\n");
            return Ok(());
        }
        for (i, (key, item)) in map.iter().enumerate() {
            if i > 0 || !inline_first {
                out.push_str(&" ".repeat(indent));
            }
            out.push_str(&self.scalar(&ConfigValue::from(key.as_str()))?);
            out.push(':');
            if Self::is_nested(item) {
                out.push('\n');
                self.write_block(item, indent + INDENT, false, out)?;
            } else {
                out.push(' ');
                out.push_str(&self.scalar(item)?);
                out.push('\n');
            }
        }
        Ok(())
    }

    fn is_nested(value: &ConfigValue) -> bool {
        match value {
            ConfigValue::Mapping(map) => !map.is_empty(),
            ConfigValue::Sequence(seq) => !seq.is_empty(),
            _ => false,
        }
    }
}

impl Default for YamlLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for YamlLoader {
    fn format_name(&self) -> &str {
        "YAML"
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
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
        // An empty document is null, not an error
        if content.trim().is_empty() {
            return Ok(ConfigValue::Null);
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::decode(self.format_name(), e))
    }

    fn render(&self, data: &ConfigMap) -> Result<String> {
        let mut out = String::new();
        self.write_mapping(data, 0, false, &mut out)?;
        Ok(out)
    }
}
