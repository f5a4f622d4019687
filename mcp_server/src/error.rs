//! Errors raised while dispatching tool and prompt invocations.

use k8s_shared_types::ManagerError;
use serde_json::{json, Value};
use thiserror::Error;

use crate::server::{JsonRpcResponse, INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND};

/// Resource (file or directory) does not exist.
pub const RESOURCE_NOT_FOUND: i32 = -32002;

/// Failure of a `tools/call` or `prompts/get` request.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Accessor(#[from] ManagerError),
}

impl DispatchError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_) | DispatchError::UnknownPrompt(_) => METHOD_NOT_FOUND,
            DispatchError::MissingArgument(_) | DispatchError::InvalidArguments { .. } => {
                INVALID_PARAMS
            }
            DispatchError::Accessor(e) => match e {
                ManagerError::NotFound(_) => RESOURCE_NOT_FOUND,
                ManagerError::NotADirectory(_) => INVALID_PARAMS,
                ManagerError::ParseError { .. }
                | ManagerError::Io { .. }
                | ManagerError::ClusterError(_) => INTERNAL_ERROR,
            },
        }
    }

    /// Stable machine-readable kind, reported as `error.data.kind`.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::UnknownTool(_) => "unknown_tool",
            DispatchError::UnknownPrompt(_) => "unknown_prompt",
            DispatchError::MissingArgument(_) => "missing_argument",
            DispatchError::InvalidArguments { .. } => "invalid_arguments",
            DispatchError::Accessor(e) => e.kind(),
        }
    }

    /// Build the error response for request `id`.
    pub fn into_response(self, id: Option<Value>) -> JsonRpcResponse {
        let mut data = json!({ "kind": self.kind() });
        if let DispatchError::MissingArgument(arg) = &self {
            data["argument"] = json!(arg);
        }
        JsonRpcResponse::error_with_data(id, self.code(), self.to_string(), data)
    }
}
