//! Error types for the user_config crate.

use thiserror::Error;

/// Result type for user_config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while locating or loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading the settings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing TOML settings.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Path resolution error.
    #[error("Path error: {0}")]
    PathError(String),

    /// Settings validation failed.
    #[error("Validation error: {0}")]
    Validation(String),
}
