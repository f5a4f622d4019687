use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Failures raised while touching the filesystem, the YAML parser or the cluster.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("File or directory not found: {0}")]
    NotFound(String),
    #[error("Path is not a directory: {0}")]
    NotADirectory(String),
    #[error("Error parsing YAML in {file}: {message}")]
    ParseError { file: String, message: String },
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("Cluster error: {0}")]
    ClusterError(String),
}

impl ManagerError {
    /// Map an I/O failure on `path`, keeping "not found" distinct.
    pub fn from_io(path: impl Into<String>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => ManagerError::NotFound(path),
            _ => ManagerError::Io {
                path,
                message: err.to_string(),
            },
        }
    }

    /// Stable machine-readable tag, reported to clients alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ManagerError::NotFound(_) => "not_found",
            ManagerError::NotADirectory(_) => "not_a_directory",
            ManagerError::ParseError { .. } => "parse_error",
            ManagerError::Io { .. } => "io_error",
            ManagerError::ClusterError(_) => "cluster_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;

/// One `{"type": "text", "text": ...}` item of a tool result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

// A pod as reported by the cluster
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodSummary {
    pub name: String,
    pub namespace: String,
    pub pod_ip: Option<String>, // unset until the pod is scheduled
}

impl PodSummary {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, pod_ip: Option<&str>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            pod_ip: pod_ip.map(str::to_string),
        }
    }
}

/// Which operations the server registers.
///
/// `Manifests` only reads YAML from disk and never needs cluster credentials;
/// `Full` adds the pod listing and deletion operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolProfile {
    Manifests,
    #[default]
    Full,
}

impl ToolProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolProfile::Manifests => "manifests",
            ToolProfile::Full => "full",
        }
    }

    pub fn needs_cluster(&self) -> bool {
        matches!(self, ToolProfile::Full)
    }
}

impl fmt::Display for ToolProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolProfile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manifests" => Ok(ToolProfile::Manifests),
            "full" => Ok(ToolProfile::Full),
            other => Err(format!(
                "unknown profile '{}', expected 'manifests' or 'full'",
                other
            )),
        }
    }
}
