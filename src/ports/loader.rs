// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader trait definition.
//!
//! A [`ConfigLoader`] is the format strategy behind a
//! [`ConfigStore`](crate::store::ConfigStore). Implementors only supply the
//! format grammar ([`parse`](ConfigLoader::parse) and
//! [`render`](ConfigLoader::render)) plus access to their state; path
//! resolution, file checks and failure handling are shared provided methods,
//! so every format reports missing files and decode errors the same way.

use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::FileSystem;
use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum accepted size for a configuration file (10MB).
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// What to encode: an in-memory mapping or raw text in the loader's format.
///
/// Raw text is decoded with the same format first, so encoding it normalizes
/// the layout.
#[derive(Debug, Clone, Copy)]
pub enum EncodeInput<'a> {
    /// An already decoded mapping.
    Mapping(&'a ConfigMap),
    /// Text in the loader's own format.
    Raw(&'a str),
}

impl<'a> From<&'a ConfigMap> for EncodeInput<'a> {
    fn from(map: &'a ConfigMap) -> Self {
        EncodeInput::Mapping(map)
    }
}

impl<'a> From<&'a str> for EncodeInput<'a> {
    fn from(raw: &'a str) -> Self {
        EncodeInput::Raw(raw)
    }
}

impl<'a> From<&'a String> for EncodeInput<'a> {
    fn from(raw: &'a String) -> Self {
        EncodeInput::Raw(raw.as_str())
    }
}

/// A serialization format strategy.
///
/// Each implementor remembers the last path it resolved and falls back to it
/// when a later call omits the path. That memory is local to the loader and
/// independent of the store's own path.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::MemoryFileSystem;
/// use cfgstore::domain::{ConfigMap, ConfigValue, Result};
/// use cfgstore::ports::{ConfigLoader, FileSystem};
/// use std::path::{Path, PathBuf};
/// use std::sync::Arc;
///
/// /// One `key=value` pair per line.
/// #[derive(Debug)]
/// struct PairsLoader {
///     fs: Arc<dyn FileSystem>,
///     path: Option<PathBuf>,
/// }
///
/// impl ConfigLoader for PairsLoader {
///     fn format_name(&self) -> &str { "Pairs" }
///     fn extensions(&self) -> &[&str] { &["pairs"] }
///     fn file_system(&self) -> &dyn FileSystem { self.fs.as_ref() }
///     fn remembered_path(&self) -> Option<&Path> { self.path.as_deref() }
///     fn remember_path(&mut self, path: PathBuf) { self.path = Some(path); }
///
///     fn parse(&self, content: &str) -> Result<ConfigValue> {
///         let mut map = ConfigMap::new();
///         for line in content.lines() {
///             if let Some((k, v)) = line.split_once('=') {
///                 map.insert(k.trim().to_string(), ConfigValue::from(v.trim()));
///             }
///         }
///         Ok(ConfigValue::Mapping(map))
///     }
///
///     fn render(&self, data: &ConfigMap) -> Result<String> {
///         Ok(data.iter().map(|(k, v)| format!("{}={}\n", k, v)).collect())
///     }
/// }
///
/// let fs = Arc::new(MemoryFileSystem::new().with_file("app.pairs", "name = demo\n"));
/// let mut loader = PairsLoader { fs, path: None };
/// let value = loader.decode(Some(Path::new("app.pairs"))).unwrap();
/// assert_eq!(value.as_mapping().unwrap()["name"], "demo");
/// ```
pub trait ConfigLoader: Send + Sync + fmt::Debug {
    /// Human readable format name, e.g. `"JSON"`.
    ///
    /// Lower-cased, this becomes the store's format tag.
    fn format_name(&self) -> &str;

    /// File extensions (without the leading dot) handled by this format.
    ///
    /// The first entry is used when building default file names.
    fn extensions(&self) -> &[&str];

    /// The file system this loader reads from and writes to.
    fn file_system(&self) -> &dyn FileSystem;

    /// The last path resolved by this loader, if any.
    fn remembered_path(&self) -> Option<&Path>;

    /// Records `path` as the fallback for later calls.
    fn remember_path(&mut self, path: PathBuf);

    /// Decodes text in this format into a value.
    ///
    /// Syntax errors must be reported as [`ConfigError::Decode`].
    fn parse(&self, content: &str) -> Result<ConfigValue>;

    /// Encodes a mapping into this format's canonical text.
    fn render(&self, data: &ConfigMap) -> Result<String>;

    /// Resolves the path to act on.
    ///
    /// An explicit path is validated, remembered and returned. Without one the
    /// remembered path is used; having neither is a
    /// [`ConfigError::Precondition`] failure since there is no file to act on.
    fn resolve_path(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::invalid_argument(
                        "File path must not be empty",
                    ));
                }
                self.remember_path(path.to_path_buf());
                Ok(path.to_path_buf())
            }
            None => self
                .remembered_path()
                .map(Path::to_path_buf)
                .ok_or_else(|| ConfigError::precondition("File path must be set")),
        }
    }

    /// Reads and decodes the file at the resolved path.
    ///
    /// The result may be any value; whether it is an acceptable configuration
    /// is decided by the store.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::MissingFile`] if the file does not exist
    /// * [`ConfigError::FileTooLarge`] if it exceeds [`MAX_CONFIG_FILE_SIZE`]
    /// * [`ConfigError::Decode`] if it is not valid UTF-8 or not valid syntax
    /// * [`ConfigError::IoError`] if reading fails
    fn decode(&mut self, path: Option<&Path>) -> Result<ConfigValue> {
        let path = self.resolve_path(path)?;
        let fs = self.file_system();

        if !fs.exists(&path) {
            return Err(ConfigError::MissingFile { path });
        }

        let size = fs.file_size(&path)?;
        if size > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::FileTooLarge {
                path,
                size,
                max: MAX_CONFIG_FILE_SIZE,
            });
        }

        let bytes = fs.read(&path)?;
        let content =
            String::from_utf8(bytes).map_err(|e| ConfigError::decode(self.format_name(), e))?;

        tracing::debug!(
            "Decoding {} bytes of {} from '{}'",
            size,
            self.format_name(),
            path.display()
        );
        self.parse(&content)
    }

    /// Encodes `input` and writes it to the resolved path, reporting errors.
    ///
    /// This is the fallible form of [`encode`](ConfigLoader::encode). It
    /// returns the path that was written.
    fn write_config(&mut self, input: EncodeInput<'_>, path: Option<&Path>) -> Result<PathBuf> {
        let path = self.resolve_path(path)?;

        let text = match input {
            EncodeInput::Mapping(data) => self.render(data)?,
            EncodeInput::Raw(raw) => {
                let data = self.parse(raw.trim())?.into_mapping().map_err(|other| {
                    ConfigError::InvalidConfig {
                        message: format!(
                            "Raw {} input must decode to a mapping, found {}",
                            self.format_name(),
                            other.type_name()
                        ),
                    }
                })?;
                self.render(&data)?
            }
        };

        self.file_system().write(&path, text.as_bytes())?;
        Ok(path)
    }

    /// Encodes `input` and writes it to the resolved path.
    ///
    /// Never fails: any error is logged and turned into `false`, so callers
    /// must check the return value.
    fn encode(&mut self, input: EncodeInput<'_>, path: Option<&Path>) -> bool {
        match self.write_config(input, path) {
            Ok(path) => {
                tracing::debug!("Saved {} config to '{}'", self.format_name(), path.display());
                true
            }
            Err(e) => {
                tracing::error!("Error saving {} config: {}", self.format_name(), e);
                false
            }
        }
    }

    /// Returns the OS-appropriate default path, `<config dir>/config.<ext>`.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    fn default_path(&self, app_name: &str, qualifier: &str) -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name)
            .ok_or_else(|| ConfigError::precondition("Failed to determine project directories"))?;
        let extension = self.extensions().first().copied().unwrap_or("conf");
        Ok(proj_dirs.config_dir().join(format!("config.{}", extension)))
    }
}
