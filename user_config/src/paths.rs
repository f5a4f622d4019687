//! XDG-compliant configuration paths.

use std::path::{Path, PathBuf};

use crate::{error::Result, ConfigError, APP_NAME};

/// Settings file name inside the configuration directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Configuration paths following the XDG Base Directory Specification.
///
/// Default location: `~/.config/k8s-manager/`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    config_dir: PathBuf,
}

impl ConfigPaths {
    /// Create paths using XDG defaults.
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::PathError("Could not determine config directory".into()))?
            .join(APP_NAME);

        Ok(Self { config_dir })
    }

    /// Create paths with a custom base directory (for testing).
    pub fn with_base(base: impl AsRef<Path>) -> Self {
        Self {
            config_dir: base.as_ref().join("config"),
        }
    }

    /// Get the base configuration directory.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the settings file path.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }

    /// Check if a settings file exists.
    pub fn settings_exist(&self) -> bool {
        self.settings_file().exists()
    }
}
