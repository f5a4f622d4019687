//! Manifest reading tools.
//!
//! These tools parse Kubernetes YAML from the local filesystem and never
//! touch the cluster.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub(crate) const READ_FILE_DESCRIPTION: &str = "Load Kubernetes YAML configurations in the supplied file path. \
If a file path is not provided, the tool will display \"\".\n\
Do not modify existing YAML configurations, simply anaylyse and state where there are potential misconfigurations.";

pub(crate) const READ_DIRECTORY_DESCRIPTION: &str = "Load Kubernetes YAML configurations in the supplied folder.\n\
If a folder_path is not provided, the tool will display [].";

/// Input for reading a single manifest file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReadManifestInput {
    /// Path of the .yaml or .yml file to load
    pub full_file_path: String,
}

/// Input for reading every manifest in a directory
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DirectoryInput {
    /// Directory whose .yaml and .yml files are loaded
    pub folder_path: String,
}
