// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration store.
//!
//! Loading raises these errors to the caller. Saving is the one exception: a
//! failed write is logged and reported as `false` instead (see
//! [`ConfigLoader::encode`](crate::ports::ConfigLoader::encode)).

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// Marked `#[non_exhaustive]` so that new kinds can be added without breaking
/// downstream matches.
///
/// # Examples
///
/// ```
/// use cfgstore::domain::ConfigError;
/// use std::path::PathBuf;
///
/// let err = ConfigError::MissingFile {
///     path: PathBuf::from("config.json"),
/// };
/// assert_eq!(err.to_string(), "File not found: config.json");
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The resolved configuration file does not exist.
    #[error("File not found: {}", path.display())]
    MissingFile {
        /// The path that was resolved
        path: PathBuf,
    },

    /// The file content is not valid syntax for the chosen format.
    #[error("Failed to decode {format} configuration: {message}")]
    Decode {
        /// Format tag of the loader that failed
        format: String,
        /// The parser's message
        message: String,
        /// The underlying parser error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A value could not be rendered in the chosen format.
    #[error("Failed to encode {format} configuration: {message}")]
    Encode {
        /// Format tag of the loader that failed
        format: String,
        /// The serializer's message
        message: String,
        /// The underlying serializer error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Decoded content is not usable as a configuration mapping.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Why the content was rejected
        message: String,
    },

    /// A setter or lookup received a value it cannot accept.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected value
        message: String,
    },

    /// An operation was attempted before its prerequisites were in place.
    ///
    /// This signals a programming error (for example saving with no loader
    /// set) rather than a runtime fault.
    #[error("Precondition failed: {message}")]
    Precondition {
        /// The missing prerequisite
        message: String,
    },

    /// Attribute-style lookup found neither a config key nor a declared property.
    #[error("No configuration key or property named '{name}'")]
    AttributeNotFound {
        /// The attribute name that was looked up
        name: String,
    },

    /// The requested configuration key is not present.
    #[error("Configuration key not found: {key}")]
    ConfigKeyNotFound {
        /// The key that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error(
        "Failed to convert configuration value for key '{key}' to type {target_type}: {source}"
    )]
    TypeConversion {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The configuration file exceeds the size the loaders accept.
    #[error("Configuration file too large: {} is {size} bytes (max {max} bytes)", path.display())]
    FileTooLarge {
        /// The offending file
        path: PathBuf,
        /// Its size in bytes
        size: u64,
        /// The accepted maximum
        max: u64,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `Decode` error from a parser error.
    pub fn decode<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Decode {
            format: format.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates an `Encode` error from a serializer error.
    pub fn encode<E>(format: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Encode {
            format: format.to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ConfigError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a `Precondition` error.
    pub fn precondition(message: impl Into<String>) -> Self {
        ConfigError::Precondition {
            message: message.into(),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
