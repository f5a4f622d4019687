//! Manifest and cluster access for the k8s-manager MCP server.
//!
//! Every operation performs one external action (a file read, a directory
//! scan, a pod list or a delete) and turns the outcome into text items.
//! Nothing is cached between calls.

pub mod manager;
pub mod paths;
pub mod render;

use std::sync::Arc;

use async_trait::async_trait;
use k8s_shared_types::{Result, TextContent};

pub use manager::{parse_manifest, K8sManager, ManifestRecord};

/// The operations the server exposes, independent of how they are backed.
#[async_trait]
pub trait Accessor: Send + Sync {
    /// Parse one manifest file.
    async fn read_manifest_file(&self, path: &str) -> Result<Vec<TextContent>>;
    /// Parse every `.yaml`/`.yml` file directly inside a directory.
    async fn read_manifest_directory(&self, path: &str) -> Result<Vec<TextContent>>;
    async fn list_pods(&self, namespace: &str) -> Result<Vec<TextContent>>;
    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<Vec<TextContent>>;
    /// Delete each pod in the namespace, one at a time.
    async fn delete_all_pods(&self, namespace: &str) -> Result<Vec<TextContent>>;
}

#[async_trait]
impl<A: Accessor + ?Sized> Accessor for Arc<A> {
    async fn read_manifest_file(&self, path: &str) -> Result<Vec<TextContent>> {
        (**self).read_manifest_file(path).await
    }

    async fn read_manifest_directory(&self, path: &str) -> Result<Vec<TextContent>> {
        (**self).read_manifest_directory(path).await
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
        (**self).list_pods(namespace).await
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<Vec<TextContent>> {
        (**self).delete_pod(name, namespace).await
    }

    async fn delete_all_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
        (**self).delete_all_pods(namespace).await
    }
}
