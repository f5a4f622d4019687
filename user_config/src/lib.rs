//! Settings for the k8s-manager MCP server.
//!
//! Settings live in `~/.config/k8s-manager/settings.toml` following XDG
//! standards. The file is optional; every field has a default.
//!
//! # Example
//!
//! ```no_run
//! use user_config::ServerSettings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = ServerSettings::load_or_default(None).await?;
//!     println!("profile: {}", settings.profile);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod paths;
mod error;

pub use config::ServerSettings;
pub use error::{ConfigError, Result};
pub use paths::ConfigPaths;

/// Application name used for XDG paths
pub const APP_NAME: &str = "k8s-manager";
