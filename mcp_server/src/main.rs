//! MCP server binary for Kubernetes manifests and pods.
//!
//! # Usage
//!
//! Run with stdio transport:
//! ```bash
//! k8s-manager-mcp --profile manifests
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use cluster_client::{KubeClientConfig, KubePodClient, PodClient};
use k8s_shared_types::ToolProfile;
use manifest_accessor::K8sManager;
use mcp_server::McpServer;
use observability::{init_tracing, TracingConfig};
use user_config::ServerSettings;

#[derive(Parser, Debug)]
#[command(name = "k8s-manager-mcp", version, about = "MCP server for Kubernetes manifests and pods")]
struct Cli {
    /// Tool profile: `manifests` (files only) or `full` (files and pods)
    #[arg(long, env = "K8S_MANAGER_PROFILE")]
    profile: Option<ToolProfile>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "K8S_MANAGER_LOG_LEVEL")]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, env = "K8S_MANAGER_JSON_LOGS")]
    json_logs: bool,

    /// Kubeconfig context to use
    #[arg(long, env = "K8S_MANAGER_KUBE_CONTEXT")]
    kube_context: Option<String>,

    /// Settings file (defaults to ~/.config/k8s-manager/settings.toml)
    #[arg(long, env = "K8S_MANAGER_CONFIG")]
    config: Option<PathBuf>,

    /// Serve pod tools from an in-memory cluster instead of a real one
    #[arg(long)]
    mock_cluster: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the settings file.
    fn merge(&self, mut settings: ServerSettings) -> ServerSettings {
        if let Some(profile) = self.profile {
            settings.profile = profile;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.clone();
        }
        if self.json_logs {
            settings.json_logs = true;
        }
        if self.kube_context.is_some() {
            settings.kube_context = self.kube_context.clone();
        }
        settings
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = ServerSettings::load_or_default(cli.config.as_deref())
        .await
        .context("failed to load settings")?;
    let settings = cli.merge(settings);

    init_tracing(
        TracingConfig::new("k8s-manager-mcp")
            .with_level_name(&settings.log_level)
            .with_json(settings.json_logs),
    )
    .context("failed to install log subscriber")?;

    info!(profile = %settings.profile, "Starting k8s-manager MCP server");

    let manager = build_manager(&cli, &settings).await?;
    let server = McpServer::new(manager, settings.profile);

    if let Err(e) = server.serve_stdio().await {
        error!("Server error: {}", e);
        return Err(anyhow::anyhow!(e));
    }
    Ok(())
}

async fn build_manager(cli: &Cli, settings: &ServerSettings) -> anyhow::Result<K8sManager> {
    if !settings.profile.needs_cluster() {
        info!("Manifest profile, no cluster client");
        return Ok(K8sManager::new());
    }

    let client: Arc<dyn PodClient> = if cli.mock_cluster {
        mock_client()?
    } else {
        let config = KubeClientConfig::default().with_context(settings.kube_context.clone());
        Arc::new(
            KubePodClient::connect(config)
                .await
                .context("failed to load Kubernetes credentials")?,
        )
    };
    Ok(K8sManager::with_pod_client(client))
}

#[cfg(feature = "mock-client")]
fn mock_client() -> anyhow::Result<Arc<dyn PodClient>> {
    info!("Using in-memory cluster");
    Ok(Arc::new(cluster_client::MockPodClient::new()))
}

#[cfg(not(feature = "mock-client"))]
fn mock_client() -> anyhow::Result<Arc<dyn PodClient>> {
    anyhow::bail!("--mock-cluster needs a build with the mock-client feature")
}
