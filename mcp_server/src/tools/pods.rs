//! Pod tools. These need a configured cluster client.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) const LIST_PODS_DESCRIPTION: &str = "Get the list of pods in the given namespace.";
pub(crate) const DELETE_POD_DESCRIPTION: &str = "Delete the pod with the given name and namespace.";
pub(crate) const DELETE_PODS_DESCRIPTION: &str = "Delete all pods in the given namespace.";

/// Input for tools scoped to one namespace
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NamespaceInput {
    /// Kubernetes namespace
    pub namespace: String,
}

/// Input for deleting one pod
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DeletePodInput {
    /// Pod name
    pub name: String,
    /// Namespace the pod lives in
    pub namespace: String,
}
