use async_trait::async_trait;
use k8s_shared_types::{ManagerError, PodSummary, Result};

/// Pod-level access to a Kubernetes cluster.
///
/// Every method performs exactly one API round trip; callers own any
/// sequencing across calls.
#[async_trait]
pub trait PodClient: Send + Sync {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<PodSummary>>;
    /// Delete one pod and return the API's raw response object.
    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<serde_json::Value>;
}

#[derive(Debug, thiserror::Error)]
pub enum PodClientError {
    #[error("Failed to load cluster configuration: {0}")]
    ConfigLoad(String),
    #[error("Failed to list pods in namespace {namespace}: {message}")]
    ListFailed { namespace: String, message: String },
    #[error("Failed to delete pod {name} in namespace {namespace}: {message}")]
    DeleteFailed {
        name: String,
        namespace: String,
        message: String,
    },
}

impl From<PodClientError> for ManagerError {
    fn from(err: PodClientError) -> Self {
        ManagerError::ClusterError(err.to_string())
    }
}
