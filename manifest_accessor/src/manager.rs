//! `K8sManager`: the filesystem- and cluster-backed `Accessor`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_yaml_ng::Value;
use tracing::{debug, info, warn};

use cluster_client_interface::PodClient;
use k8s_shared_types::{ManagerError, PodSummary, Result, TextContent};

use crate::paths::{self, base_name, is_manifest_name};
use crate::render::render_document;
use crate::Accessor;

/// A parsed manifest and the name it is reported under.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRecord {
    pub file_name: String,
    pub content: Value,
}

impl ManifestRecord {
    /// `<file_name>:'<rendered content>'`
    pub fn to_text(&self) -> TextContent {
        TextContent::new(format!(
            "{}:'{}'",
            self.file_name,
            render_document(&self.content)
        ))
    }
}

/// Parse manifest text. Whitespace-only input is an empty document.
pub fn parse_manifest(file_name: &str, text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml_ng::from_str(text).map_err(|e| ManagerError::ParseError {
        file: file_name.to_string(),
        message: e.to_string(),
    })
}

async fn load_manifest(path: &Path, file_name: &str) -> Result<ManifestRecord> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ManagerError::from_io(paths::display(path), e))?;
    let content = parse_manifest(file_name, &text)?;
    Ok(ManifestRecord {
        file_name: file_name.to_string(),
        content,
    })
}

fn pod_line(pod: &PodSummary) -> String {
    format!(
        "{}{}{}",
        pod.name,
        pod.namespace,
        pod.pod_ip.as_deref().unwrap_or("None")
    )
}

/// Reads manifests from disk and manages pods through an optional `PodClient`.
///
/// Without a pod client only the manifest operations succeed; the pod
/// operations fail with a cluster error.
#[derive(Clone, Default)]
pub struct K8sManager {
    pods: Option<Arc<dyn PodClient>>,
}

impl K8sManager {
    /// Manager for manifest reading only.
    pub fn new() -> Self {
        Self { pods: None }
    }

    pub fn with_pod_client(client: Arc<dyn PodClient>) -> Self {
        Self { pods: Some(client) }
    }

    pub fn has_cluster(&self) -> bool {
        self.pods.is_some()
    }

    fn pod_client(&self) -> Result<&dyn PodClient> {
        self.pods
            .as_deref()
            .ok_or_else(|| ManagerError::ClusterError("cluster access is not configured".into()))
    }
}

#[async_trait]
impl Accessor for K8sManager {
    async fn read_manifest_file(&self, path: &str) -> Result<Vec<TextContent>> {
        debug!(path, "Reading manifest file");
        let record = load_manifest(Path::new(path), base_name(path)).await?;
        Ok(vec![record.to_text()])
    }

    async fn read_manifest_directory(&self, path: &str) -> Result<Vec<TextContent>> {
        let dir = paths::resolve_directory(path)?;
        let shown = paths::display(&dir);
        debug!(requested = path, resolved = %shown, "Reading manifest directory");

        let metadata = tokio::fs::metadata(&dir)
            .await
            .map_err(|e| ManagerError::from_io(shown.clone(), e))?;
        if !metadata.is_dir() {
            return Err(ManagerError::NotADirectory(shown));
        }

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| ManagerError::from_io(shown.clone(), e))?;

        let mut candidates = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ManagerError::from_io(shown.clone(), e))?
        {
            let file_name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    warn!(name = ?raw, "Skipping non UTF-8 file name");
                    continue;
                }
            };
            if !is_manifest_name(&file_name) {
                continue;
            }
            // metadata() follows symlinks; dangling links are skipped
            let entry_path = entry.path();
            let is_file = tokio::fs::metadata(&entry_path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if is_file {
                candidates.push((file_name, entry_path));
            }
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut items = Vec::with_capacity(candidates.len());
        for (file_name, entry_path) in &candidates {
            let record = load_manifest(entry_path, file_name).await?;
            items.push(record.to_text());
        }

        info!(directory = %shown, manifests = items.len(), "Loaded manifests");
        Ok(items)
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
        let pods = self.pod_client()?.list_pods(namespace).await?;
        debug!(namespace, count = pods.len(), "Listed pods");
        Ok(pods.iter().map(|p| TextContent::new(pod_line(p))).collect())
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<Vec<TextContent>> {
        let response = self.pod_client()?.delete_pod(name, namespace).await?;
        info!(name, namespace, "Deleted pod");
        Ok(vec![TextContent::new(format!(
            "Successfully deleted pod: {} with response: {}",
            name, response
        ))])
    }

    async fn delete_all_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
        let client = self.pod_client()?;
        let pods = client.list_pods(namespace).await?;

        for (deleted, pod) in pods.iter().enumerate() {
            if let Err(err) = client.delete_pod(&pod.name, namespace).await {
                let reason = match err {
                    ManagerError::ClusterError(message) => message,
                    other => other.to_string(),
                };
                return Err(ManagerError::ClusterError(format!(
                    "{} ({} of {} pods deleted before the failure)",
                    reason,
                    deleted,
                    pods.len()
                )));
            }
        }

        info!(namespace, count = pods.len(), "Deleted all pods");
        Ok(vec![TextContent::new(format!(
            "Successfully deleted pods in namespace: {}",
            namespace
        ))])
    }
}
