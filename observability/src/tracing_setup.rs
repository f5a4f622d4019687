//! Log subscriber setup for the MCP server process.
//!
//! Stdout is owned by the protocol stream, so every format writes to stderr.

use std::fmt;
use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

pub use tracing_subscriber::util::TryInitError;

/// How log records are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One human-readable line per event, no ANSI colors.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Service name recorded in the startup event
    pub service_name: String,
    /// Default level when `RUST_LOG` is unset
    pub log_level: Level,
    pub format: LogFormat,
    /// Whether to include target (module path)
    pub include_target: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            service_name: "k8s-manager-mcp".to_string(),
            log_level: Level::INFO,
            format: LogFormat::Text,
            include_target: true,
        }
    }
}

impl TracingConfig {
    /// Create a new config with the given service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set the log level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.log_level = level;
        self
    }

    /// Set the log level by name. Unrecognized names leave the level as is.
    pub fn with_level_name(mut self, name: &str) -> Self {
        if let Ok(level) = Level::from_str(name.trim()) {
            self.log_level = level;
        }
        self
    }

    /// Switch between text and JSON output.
    pub fn with_json(mut self, json: bool) -> Self {
        self.format = LogFormat::from_json_flag(json);
        self
    }

    pub fn with_target(mut self, include: bool) -> Self {
        self.include_target = include;
        self
    }

    /// `RUST_LOG` wins over the configured level.
    fn build_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.log_level.as_str()))
    }

    fn build_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_target(self.include_target);

        match self.format {
            LogFormat::Text => layer.with_filter(self.build_filter()).boxed(),
            LogFormat::Json => layer.json().with_filter(self.build_filter()).boxed(),
        }
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use observability::{init_tracing, TracingConfig};
///
/// init_tracing(TracingConfig::new("k8s-manager-mcp").with_level_name("debug"))
///     .expect("subscriber already set");
/// ```
pub fn init_tracing(config: TracingConfig) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(config.build_layer())
        .try_init()?;

    tracing::info!(
        service = %config.service_name,
        level = %config.log_level,
        format = %config.format,
        "Tracing initialized"
    );
    Ok(())
}

/// Span wrapping one MCP request.
#[macro_export]
macro_rules! request_span {
    ($method:expr) => {
        tracing::info_span!("mcp_request", method = %$method)
    };
}
