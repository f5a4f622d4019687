//! Mock pod client for testing and development.
//!
//! Keeps an ordered in-memory pod list and counts every call, so tests can
//! assert both what a caller saw and how many API round trips it made.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info};

use cluster_client_interface::{PodClient, PodClientError};
use k8s_shared_types::{PodSummary, Result};

/// In-memory `PodClient` that preserves insertion order.
#[derive(Clone, Default)]
pub struct MockPodClient {
    pods: Arc<RwLock<Vec<PodSummary>>>,
    /// Pod names whose deletion should fail
    failing_deletes: Arc<RwLock<HashSet<String>>>,
    list_calls: Arc<AtomicUsize>,
    delete_calls: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockPodClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPodClient")
            .field("pods", &self.pods)
            .field("list_calls", &self.list_calls)
            .field("delete_calls", &self.delete_calls)
            .finish()
    }
}

impl MockPodClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client pre-populated with pods, returned in the given order.
    pub fn with_pods(pods: Vec<PodSummary>) -> Self {
        Self {
            pods: Arc::new(RwLock::new(pods)),
            ..Self::default()
        }
    }

    pub async fn add_pod(&self, pod: PodSummary) {
        info!(
            "MockPodClient: Adding pod {}/{}",
            pod.namespace, pod.name
        );
        self.pods.write().await.push(pod);
    }

    /// Make every later delete of `name` fail with a cluster error.
    pub async fn fail_delete_of(&self, name: &str) {
        self.failing_deletes.write().await.insert(name.to_string());
    }

    pub async fn pod_count(&self) -> usize {
        self.pods.read().await.len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PodClient for MockPodClient {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockPodClient: Listing pods in {}", namespace);
        Ok(self
            .pods
            .read()
            .await
            .iter()
            .filter(|p| p.namespace == namespace)
            .cloned()
            .collect())
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<serde_json::Value> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        debug!("MockPodClient: Deleting pod {}/{}", namespace, name);

        if self.failing_deletes.read().await.contains(name) {
            return Err(PodClientError::DeleteFailed {
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: "injected failure".to_string(),
            }
            .into());
        }

        let mut pods = self.pods.write().await;
        let position = pods
            .iter()
            .position(|p| p.name == name && p.namespace == namespace)
            .ok_or_else(|| PodClientError::DeleteFailed {
                name: name.to_string(),
                namespace: namespace.to_string(),
                message: format!("pods \"{}\" not found", name),
            })?;
        let pod = pods.remove(position);

        Ok(json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": pod.name,
                "namespace": pod.namespace,
            },
            "status": {
                "phase": "Running",
                "podIP": pod.pod_ip,
            }
        }))
    }
}
