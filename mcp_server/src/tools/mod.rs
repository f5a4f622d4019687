//! MCP tools exposed by the server.
//!
//! Each tool has a typed input struct. The JSON Schema published by
//! `tools/list` is generated from that struct, and `tools/call` arguments are
//! deserialized into it, so the published schema is also the one enforced.

pub mod manifest;
pub mod pods;

use std::fmt;
use std::str::FromStr;

use k8s_shared_types::ToolProfile;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DispatchError;

pub use manifest::{DirectoryInput, ReadManifestInput};
pub use pods::{DeletePodInput, NamespaceInput};

/// The closed set of tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ReadK8sYaml,
    GetFilesInDirectory,
    GetPodsByNamespace,
    DeleteNamespacePod,
    DeleteNamespacePods,
}

impl ToolName {
    /// Every tool, in discovery order.
    pub const ALL: [ToolName; 5] = [
        ToolName::GetFilesInDirectory,
        ToolName::ReadK8sYaml,
        ToolName::GetPodsByNamespace,
        ToolName::DeleteNamespacePod,
        ToolName::DeleteNamespacePods,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::ReadK8sYaml => "read_k8s_yaml",
            ToolName::GetFilesInDirectory => "get_files_in_directory",
            ToolName::GetPodsByNamespace => "get_pods_by_namespace",
            ToolName::DeleteNamespacePod => "delete_namespace_pod",
            ToolName::DeleteNamespacePods => "delete_namespace_pods",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::ReadK8sYaml => manifest::READ_FILE_DESCRIPTION,
            ToolName::GetFilesInDirectory => manifest::READ_DIRECTORY_DESCRIPTION,
            ToolName::GetPodsByNamespace => pods::LIST_PODS_DESCRIPTION,
            ToolName::DeleteNamespacePod => pods::DELETE_POD_DESCRIPTION,
            ToolName::DeleteNamespacePods => pods::DELETE_PODS_DESCRIPTION,
        }
    }

    /// JSON Schema of the tool's input struct.
    pub fn input_schema(&self) -> Value {
        match self {
            ToolName::ReadK8sYaml => schema_of::<ReadManifestInput>(),
            ToolName::GetFilesInDirectory => schema_of::<DirectoryInput>(),
            ToolName::GetPodsByNamespace | ToolName::DeleteNamespacePods => {
                schema_of::<NamespaceInput>()
            }
            ToolName::DeleteNamespacePod => schema_of::<DeletePodInput>(),
        }
    }

    /// Whether the tool talks to the cluster.
    pub fn requires_cluster(&self) -> bool {
        matches!(
            self,
            ToolName::GetPodsByNamespace
                | ToolName::DeleteNamespacePod
                | ToolName::DeleteNamespacePods
        )
    }

    /// Whether the tool is registered under `profile`.
    pub fn is_available(&self, profile: ToolProfile) -> bool {
        !self.requires_cluster() || profile.needs_cluster()
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| DispatchError::UnknownTool(s.to_string()))
    }
}

fn schema_of<T: JsonSchema>() -> Value {
    serde_json::to_value(schemars::schema_for!(T)).unwrap_or_default()
}

/// Deserialize `tools/call` arguments into a tool's input struct.
///
/// Absent arguments are treated as an empty object, so a tool with required
/// fields reports which one is missing.
pub fn parse_input<T: DeserializeOwned>(tool: ToolName, arguments: Value) -> Result<T, DispatchError> {
    let arguments = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| DispatchError::InvalidArguments {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Tool definitions for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinitions {
    /// Available tools
    pub tools: Vec<ToolInfo>,
}

/// Information about a single tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input schema (JSON Schema)
    pub input_schema: Value,
}

impl ToolDefinitions {
    /// Tool definitions registered under `profile`.
    pub fn for_profile(profile: ToolProfile) -> Self {
        Self {
            tools: ToolName::ALL
                .iter()
                .filter(|tool| tool.is_available(profile))
                .map(|tool| ToolInfo {
                    name: tool.as_str().to_string(),
                    description: tool.description().to_string(),
                    input_schema: tool.input_schema(),
                })
                .collect(),
        }
    }

    /// Every tool definition.
    pub fn all() -> Self {
        Self::for_profile(ToolProfile::Full)
    }
}
