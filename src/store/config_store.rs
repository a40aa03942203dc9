// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration store.
//!
//! A [`ConfigStore`] owns the decoded mapping for one configuration file and
//! delegates all format work to its [`ConfigLoader`]. It validates what the
//! loader produces, remembers the file it works on, and offers keyed and
//! attribute-style access to the data.

use crate::adapters::{registry, LocalFileSystem};
use crate::domain::{ConfigError, ConfigMap, ConfigValue, Result};
use crate::ports::{ConfigLoader, EncodeInput, FileSystem};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::ops::{Index, IndexMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Store properties reachable through [`ConfigStore::attr`] when no config key
/// shadows them.
const DECLARED_PROPERTIES: [&str; 3] = ["initialized", "file_path", "format_tag"];

/// An in-memory configuration container backed by a pluggable loader.
///
/// The store is not synchronized; wrap it in a `Mutex` to share it between
/// threads.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::{JsonLoader, MemoryFileSystem};
/// use cfgstore::store::ConfigStore;
/// use std::sync::Arc;
///
/// # fn main() -> cfgstore::domain::Result<()> {
/// let fs = Arc::new(MemoryFileSystem::new().with_file("config.json", r#"{"key": "value"}"#));
/// let mut store = ConfigStore::builder()
///     .path("config.json")
///     .loader(Box::new(JsonLoader::with_file_system(fs)))
///     .build()?;
///
/// store.load()?;
/// assert!(store.is_initialized());
/// assert_eq!(store["key"], "value");
/// assert_eq!(*store.attr("key")?, "value");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigStore {
    /// The decoded configuration, replaced wholesale on every load
    data: ConfigMap,
    /// Set once a load has succeeded
    initialized: bool,
    /// Path used by the last load or save
    file_path: Option<PathBuf>,
    /// Active format strategy
    loader: Option<Box<dyn ConfigLoader>>,
    /// Lower-cased format name of the active loader
    format_tag: Option<String>,
}

impl ConfigStore {
    /// Creates an empty store with no path and no loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new store builder.
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    /// Opens and loads `path`, choosing the loader from its extension.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use cfgstore::store::ConfigStore;
    ///
    /// # fn main() -> cfgstore::domain::Result<()> {
    /// let store = ConfigStore::open("/etc/myapp/config.yaml")?;
    /// println!("{} keys", store.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::builder().path(path.as_ref()).detect_format().build()?;
        store.load()?;
        Ok(store)
    }

    /// Creates an unloaded store pointed at the OS-appropriate config file.
    ///
    /// The file is `<config dir>/config.<ext>`, where the extension comes from
    /// the loader.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    /// * `loader` - The format strategy to use
    pub fn from_default_location(
        app_name: &str,
        qualifier: &str,
        loader: Box<dyn ConfigLoader>,
    ) -> Result<Self> {
        let path = loader.default_path(app_name, qualifier)?;
        Self::builder().path(path).loader(loader).build()
    }

    /// Returns true once a load has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The path used by the last load or save, or the one set explicitly.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Sets the path used when load or save are called without one.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] if the path is empty.
    pub fn set_file_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::invalid_argument("File path must not be empty"));
        }
        self.file_path = Some(path.to_path_buf());
        Ok(())
    }

    /// The active loader, if one is set.
    pub fn loader(&self) -> Option<&dyn ConfigLoader> {
        self.loader.as_deref()
    }

    /// Short diagnostic name of the active loader's format, e.g. `"json"`.
    pub fn format_tag(&self) -> Option<&str> {
        self.format_tag.as_deref()
    }

    /// Replaces the loader and recomputes the format tag.
    pub fn set_loader(&mut self, loader: Box<dyn ConfigLoader>) {
        let tag = loader.format_name().to_lowercase();
        tracing::debug!("Using {} loader", tag);
        self.format_tag = Some(tag);
        self.loader = Some(loader);
    }

    /// Replaces the loader with a built-in one looked up by format tag.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] if no loader is registered for `tag`.
    pub fn set_loader_by_tag(&mut self, tag: &str) -> Result<()> {
        let loader = registry::builtin().create(tag)?;
        self.set_loader(loader);
        Ok(())
    }

    /// Loads the configuration from the current path with the current loader.
    pub fn load(&mut self) -> Result<()> {
        self.load_with(None, None)
    }

    /// Loads the configuration from `path` and remembers it.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_with(None, Some(path.as_ref()))
    }

    /// Loads the configuration, optionally switching loader and path first.
    ///
    /// An explicit loader or path replaces the store's current one, even if
    /// the load then fails.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Precondition`] if no path or no loader is available
    /// * [`ConfigError::MissingFile`], [`ConfigError::Decode`] and I/O errors
    ///   from the loader
    /// * [`ConfigError::InvalidConfig`] if the file does not decode to a
    ///   non-empty mapping; the current data is kept in that case
    pub fn load_with(
        &mut self,
        loader: Option<Box<dyn ConfigLoader>>,
        path: Option<&Path>,
    ) -> Result<()> {
        let path = self.resolve_path(path)?;
        if let Some(loader) = loader {
            self.set_loader(loader);
        }
        let loader = self
            .loader
            .as_mut()
            .ok_or_else(|| ConfigError::precondition("The config loader must be set"))?;

        let data = match loader.decode(Some(&path))? {
            ConfigValue::Mapping(map) => map,
            other => {
                return Err(ConfigError::InvalidConfig {
                    message: format!(
                        "Loaded config data must be a mapping, found {}",
                        other.type_name()
                    ),
                })
            }
        };
        if data.is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "Loaded config data is empty".to_string(),
            });
        }

        tracing::info!(
            "Loaded {} keys of {} config from '{}'",
            data.len(),
            loader.format_name(),
            path.display()
        );
        self.data = data;
        self.initialized = true;
        Ok(())
    }

    /// Saves the configuration to the current path.
    pub fn save(&mut self) -> Result<bool> {
        self.save_to(None)
    }

    /// Saves the configuration, to `path` if given (and remembers it).
    ///
    /// Returns `Ok(true)` on success and `Ok(false)` if encoding or writing
    /// failed; the failure is logged, not raised, so the return value must be
    /// checked. Neither the data nor the initialized flag change.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Precondition`] if no path or no loader is available.
    pub fn save_to(&mut self, path: Option<&Path>) -> Result<bool> {
        let path = self.resolve_path(path)?;
        let loader = self
            .loader
            .as_mut()
            .ok_or_else(|| ConfigError::precondition("The config loader must be set"))?;

        tracing::debug!("Saving {} keys to '{}'", self.data.len(), path.display());
        Ok(loader.encode(EncodeInput::Mapping(&self.data), Some(&path)))
    }

    /// Returns the explicit path (remembering it) or the current one.
    fn resolve_path(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => {
                self.set_file_path(path)?;
                Ok(path.to_path_buf())
            }
            None => self
                .file_path
                .clone()
                .ok_or_else(|| ConfigError::precondition("File path must be set")),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.data.get(key)
    }

    /// Returns the value stored under `key` mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.data.get_mut(key)
    }

    /// Deserializes the value under `key` into `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgstore::store::ConfigStore;
    ///
    /// let mut store = ConfigStore::new();
    /// store.set("port", 8080);
    /// let port: u16 = store.get_as("port").unwrap();
    /// assert_eq!(port, 8080);
    /// ```
    pub fn get_as<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.data
            .get(key)
            .ok_or_else(|| ConfigError::ConfigKeyNotFound {
                key: key.to_string(),
            })?
            .deserialize_as(key)
    }

    /// Stores `value` under `key`, returning the previous value.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.data.insert(key.into(), value.into())
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.data.shift_remove(key)
    }

    /// Returns true if `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Iterates over the current `(key, value)` pairs in order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, ConfigValue> {
        self.data.iter()
    }

    /// Iterates over the current keys in order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, ConfigValue> {
        self.data.keys()
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Attribute-style lookup.
    ///
    /// A config key always wins; otherwise the store properties
    /// `initialized`, `file_path` and `format_tag` are consulted.
    ///
    /// # Errors
    ///
    /// [`ConfigError::AttributeNotFound`] if neither resolves.
    pub fn attr(&self, name: &str) -> Result<Cow<'_, ConfigValue>> {
        if let Some(value) = self.data.get(name) {
            return Ok(Cow::Borrowed(value));
        }

        let property = match name {
            "initialized" => ConfigValue::Bool(self.initialized),
            "file_path" => self
                .file_path
                .as_ref()
                .map(|p| ConfigValue::from(p.display().to_string()))
                .unwrap_or_default(),
            "format_tag" => self
                .format_tag
                .as_ref()
                .map(|t| ConfigValue::from(t.as_str()))
                .unwrap_or_default(),
            _ => {
                return Err(ConfigError::AttributeNotFound {
                    name: name.to_string(),
                })
            }
        };
        Ok(Cow::Owned(property))
    }

    /// Attribute-style assignment.
    ///
    /// Writes always land in the config data, same as [`set`](Self::set).
    /// Store properties are read-only here, so a name that matches one and is
    /// not already a config key is rejected.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] for a store property name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<ConfigValue>) -> Result<()> {
        if !self.data.contains_key(name) && DECLARED_PROPERTIES.contains(&name) {
            return Err(ConfigError::invalid_argument(format!(
                "'{}' is a read-only store property",
                name
            )));
        }
        self.data.insert(name.to_string(), value.into());
        Ok(())
    }

    /// The live configuration mapping; no copy is made.
    pub fn to_mapping(&self) -> &ConfigMap {
        &self.data
    }

    /// The live configuration mapping, mutably.
    pub fn to_mapping_mut(&mut self) -> &mut ConfigMap {
        &mut self.data
    }
}

impl Index<&str> for ConfigStore {
    type Output = ConfigValue;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    fn index(&self, key: &str) -> &ConfigValue {
        &self.data[key]
    }
}

impl IndexMut<&str> for ConfigStore {
    /// # Panics
    ///
    /// Panics if `key` is not present; use [`ConfigStore::set`] to add keys.
    fn index_mut(&mut self, key: &str) -> &mut ConfigValue {
        &mut self.data[key]
    }
}

impl<'a> IntoIterator for &'a ConfigStore {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = indexmap::map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

/// Builder for constructing a [`ConfigStore`].
///
/// The loader is chosen in this order: an explicit [`loader`](Self::loader),
/// then a [`format`](Self::format) tag, then the path's extension if
/// [`detect_format`](Self::detect_format) was requested.
///
/// # Examples
///
/// ```rust
/// use cfgstore::store::ConfigStoreBuilder;
///
/// # fn main() -> cfgstore::domain::Result<()> {
/// let store = ConfigStoreBuilder::new()
///     .path("settings.yml")
///     .detect_format()
///     .build()?;
/// assert_eq!(store.format_tag(), Some("yaml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigStoreBuilder {
    path: Option<PathBuf>,
    loader: Option<Box<dyn ConfigLoader>>,
    format: Option<String>,
    detect_format: bool,
    fs: Option<Arc<dyn FileSystem>>,
}

impl ConfigStoreBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file path.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Uses the given loader.
    pub fn loader(mut self, loader: Box<dyn ConfigLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Uses the built-in loader registered for `tag` (e.g. `"json"`).
    pub fn format(mut self, tag: impl Into<String>) -> Self {
        self.format = Some(tag.into());
        self
    }

    /// Picks the built-in loader from the path's file extension.
    pub fn detect_format(mut self) -> Self {
        self.detect_format = true;
        self
    }

    /// File system for loaders created from a format tag or extension.
    ///
    /// Ignored when an explicit loader is given.
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    /// Builds the store.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::InvalidArgument`] for an empty path or an unknown
    ///   format
    /// * [`ConfigError::Precondition`] if format detection was requested
    ///   without a path
    pub fn build(self) -> Result<ConfigStore> {
        let mut store = ConfigStore::new();
        if let Some(path) = &self.path {
            store.set_file_path(path)?;
        }

        let fs = self
            .fs
            .unwrap_or_else(|| Arc::new(LocalFileSystem::new()));
        let registry = registry::builtin();

        let loader = if let Some(loader) = self.loader {
            Some(loader)
        } else if let Some(tag) = &self.format {
            Some(registry.create_with(tag, fs)?)
        } else if self.detect_format {
            let path = self.path.as_deref().ok_or_else(|| {
                ConfigError::precondition("A file path is required to detect the config format")
            })?;
            Some(registry.for_path_with(path, fs)?)
        } else {
            None
        };

        if let Some(loader) = loader {
            store.set_loader(loader);
        }
        Ok(store)
    }
}
