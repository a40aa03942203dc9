// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of loader constructors keyed by format tag and file extension.
//!
//! Picking a loader by name or by file extension goes through here, so adding
//! a format means registering one constructor.

use crate::adapters::LocalFileSystem;
use crate::domain::{ConfigError, Result};
use crate::ports::{ConfigLoader, FileSystem};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Constructs a loader on top of a file system.
pub type LoaderFactory = Arc<dyn Fn(Arc<dyn FileSystem>) -> Box<dyn ConfigLoader> + Send + Sync>;

static BUILTIN: Lazy<LoaderRegistry> = Lazy::new(LoaderRegistry::with_builtins);

/// Returns the process-wide registry holding the built-in formats.
pub fn builtin() -> &'static LoaderRegistry {
    &BUILTIN
}

/// Maps format tags and file extensions to loader constructors.
///
/// Tags and extensions are matched case-insensitively.
///
/// # Examples
///
/// ```rust
/// use cfgstore::adapters::LoaderRegistry;
/// use std::path::Path;
///
/// let registry = LoaderRegistry::with_builtins();
/// let loader = registry.for_path(Path::new("settings.yml")).unwrap();
/// assert_eq!(loader.format_name(), "YAML");
///
/// assert!(registry.create("InvalidLoader").is_err());
/// ```
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    factories: IndexMap<String, LoaderFactory>,
    extensions: HashMap<String, String>,
}

impl LoaderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every format enabled at compile time.
    pub fn with_builtins() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "json")]
        registry.register("json", &["json"], |fs| {
            Box::new(crate::adapters::JsonLoader::with_file_system(fs))
        });

        #[cfg(feature = "yaml")]
        registry.register("yaml", &["yaml", "yml"], |fs| {
            Box::new(crate::adapters::YamlLoader::with_file_system(fs))
        });

        registry
    }

    /// Registers a constructor under `tag` and the given file extensions.
    ///
    /// Registering an existing tag replaces its constructor.
    pub fn register<F>(&mut self, tag: &str, extensions: &[&str], factory: F)
    where
        F: Fn(Arc<dyn FileSystem>) -> Box<dyn ConfigLoader> + Send + Sync + 'static,
    {
        let tag = tag.to_lowercase();
        if self.factories.contains_key(&tag) {
            tracing::warn!("Replacing loader registered for format '{}'", tag);
        }
        for ext in extensions {
            self.extensions
                .insert(ext.trim_start_matches('.').to_lowercase(), tag.clone());
        }
        self.factories.insert(tag, Arc::new(factory));
    }

    /// Returns true if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.factories.contains_key(&tag.to_lowercase())
    }

    /// Registered format tags in registration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Returns the tag registered for the extension of `path`.
    pub fn tag_for_path(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.extensions.get(&ext).map(String::as_str)
    }

    /// Creates a loader for `tag` that works on the local disk.
    pub fn create(&self, tag: &str) -> Result<Box<dyn ConfigLoader>> {
        self.create_with(tag, Arc::new(LocalFileSystem::new()))
    }

    /// Creates a loader for `tag` on top of `fs`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] if no loader is registered for `tag`.
    pub fn create_with(&self, tag: &str, fs: Arc<dyn FileSystem>) -> Result<Box<dyn ConfigLoader>> {
        let factory = self.factories.get(&tag.to_lowercase()).ok_or_else(|| {
            ConfigError::invalid_argument(format!(
                "No config loader registered for format '{}' (known: {})",
                tag,
                self.tags().collect::<Vec<_>>().join(", ")
            ))
        })?;
        Ok(factory(fs))
    }

    /// Creates a loader chosen by the extension of `path`, on the local disk.
    pub fn for_path(&self, path: &Path) -> Result<Box<dyn ConfigLoader>> {
        self.for_path_with(path, Arc::new(LocalFileSystem::new()))
    }

    /// Creates a loader chosen by the extension of `path`, on top of `fs`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidArgument`] if the extension is missing or unknown.
    pub fn for_path_with(
        &self,
        path: &Path,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Box<dyn ConfigLoader>> {
        let tag = self.tag_for_path(path).ok_or_else(|| {
            ConfigError::invalid_argument(format!(
                "Cannot determine config format from path '{}'",
                path.display()
            ))
        })?;
        self.create_with(tag, fs)
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderRegistry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .field("extensions", &self.extensions)
            .finish()
    }
}
