//! Server settings loaded from `settings.toml`.

use std::path::Path;

use k8s_shared_types::ToolProfile;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::paths::ConfigPaths;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Settings for one server process. Command-line flags override these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Which tools and prompts are exposed.
    pub profile: ToolProfile,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Emit logs as JSON lines.
    pub json_logs: bool,
    /// Kubeconfig context to use instead of the current one.
    pub kube_context: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            profile: ToolProfile::default(),
            log_level: "info".to_string(),
            json_logs: false,
            kube_context: None,
        }
    }
}

impl ServerSettings {
    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: ServerSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file that must exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_toml(&content)
    }

    /// Load settings from `path`, or from the XDG settings file when no path is
    /// given. A missing XDG file yields the defaults; an explicit path must exist.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        let paths = match ConfigPaths::new() {
            Ok(paths) => paths,
            Err(e) => {
                debug!(error = %e, "No config directory, using default settings");
                return Ok(Self::default());
            }
        };
        Self::load_from_paths(&paths).await
    }

    /// Load from the settings file under `paths`, falling back to defaults.
    pub async fn load_from_paths(paths: &ConfigPaths) -> Result<Self> {
        let file = paths.settings_file();
        if !file.exists() {
            debug!(path = %file.display(), "Settings file absent, using defaults");
            return Ok(Self::default());
        }
        Self::load(file).await
    }

    fn validate(&self) -> Result<()> {
        let level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "log_level '{}' must be one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        if matches!(&self.kube_context, Some(ctx) if ctx.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "kube_context must not be empty".into(),
            ));
        }
        Ok(())
    }
}
