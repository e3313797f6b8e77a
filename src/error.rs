//! Configuration error types
//!
//! Gameplay never fails; these errors only come from loading and validating
//! tuning, settings and high-score files.

use std::fmt;
use std::path::PathBuf;

/// Error raised while loading or validating on-disk configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON for the expected type.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The value could not be encoded as JSON for writing.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A value is outside its safe operating range.
    UnsafeValue {
        /// Field name (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to access '{}': {}", path.display(), source)
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse '{}': {}", path.display(), source)
            }
            ConfigError::Serialize { path, source } => {
                write!(f, "failed to serialize '{}': {}", path.display(), source)
            }
            ConfigError::UnsafeValue {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "'{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Serialize { source, .. } => Some(source),
            ConfigError::UnsafeValue { .. } => None,
        }
    }
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
