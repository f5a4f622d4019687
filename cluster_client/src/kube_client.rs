//! `kube`-backed pod client.
//!
//! Credentials come from the ambient kubeconfig (or the in-cluster service
//! account) and are loaded once, when the client is created.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, DeleteParams, ListParams};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};
use tracing::{debug, info};

use cluster_client_interface::{PodClient, PodClientError};
use k8s_shared_types::{PodSummary, Result};

/// Configuration for the KubePodClient.
#[derive(Debug, Clone, Default)]
pub struct KubeClientConfig {
    /// Kubeconfig context to use instead of the current one.
    pub context: Option<String>,
}

impl KubeClientConfig {
    pub fn with_context(mut self, context: Option<String>) -> Self {
        self.context = context;
        self
    }
}

/// Pod client talking to a real API server.
#[derive(Clone)]
pub struct KubePodClient {
    client: Client,
}

impl std::fmt::Debug for KubePodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubePodClient")
            .field("default_namespace", &self.client.default_namespace())
            .finish()
    }
}

impl KubePodClient {
    /// Load cluster configuration and build a client.
    pub async fn connect(config: KubeClientConfig) -> Result<Self> {
        let kube_config = match config.context {
            Some(ref context) => {
                let options = KubeConfigOptions {
                    context: Some(context.clone()),
                    ..Default::default()
                };
                Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| PodClientError::ConfigLoad(e.to_string()))?
            }
            None => Config::infer()
                .await
                .map_err(|e| PodClientError::ConfigLoad(e.to_string()))?,
        };

        let client =
            Client::try_from(kube_config).map_err(|e| PodClientError::ConfigLoad(e.to_string()))?;

        info!(
            context = config.context.as_deref().unwrap_or("<current>"),
            "Kubernetes client ready"
        );
        Ok(Self { client })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Reduce an API pod object to the fields the tools report.
pub(crate) fn summarize(pod: &Pod, namespace: &str) -> PodSummary {
    PodSummary {
        name: pod.metadata.name.clone().unwrap_or_default(),
        namespace: pod
            .metadata
            .namespace
            .clone()
            .unwrap_or_else(|| namespace.to_string()),
        pod_ip: pod.status.as_ref().and_then(|s| s.pod_ip.clone()),
    }
}

#[async_trait]
impl PodClient for KubePodClient {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>> {
        debug!(namespace, "Listing pods");
        let list = self
            .pods(namespace)
            .list(&ListParams::default())
            .await
            .map_err(|e| PodClientError::ListFailed {
                namespace: namespace.to_string(),
                message: e.to_string(),
            })?;

        Ok(list.items.iter().map(|pod| summarize(pod, namespace)).collect())
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<serde_json::Value> {
        debug!(name, namespace, "Deleting pod");
        let delete_failed = |message: String| PodClientError::DeleteFailed {
            name: name.to_string(),
            namespace: namespace.to_string(),
            message,
        };

        let response = self
            .pods(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| delete_failed(e.to_string()))?;

        // Left: the pod as it looks while terminating; Right: a Status for immediate deletes.
        let raw = response
            .either(serde_json::to_value, serde_json::to_value)
            .map_err(|e| delete_failed(e.to_string()))?;
        Ok(raw)
    }
}
