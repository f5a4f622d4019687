//! MCP server for Kubernetes manifests and pods.
//!
//! Exposes five tools and five prompts to an AI assistant host over the
//! Model Context Protocol:
//!
//! - **Tools**: parse one manifest, parse a directory of manifests, list the
//!   pods of a namespace, delete one pod, delete every pod in a namespace
//! - **Prompts**: review templates for manifests and one-line pod actions
//!
//! # Architecture
//!
//! The server speaks JSON-RPC 2.0 over stdio. Tool calls go through the
//! [`manifest_accessor::Accessor`] trait; the active
//! [`k8s_shared_types::ToolProfile`] decides which operations are registered.

pub mod error;
pub mod prompts;
pub mod server;
pub mod tools;

pub use error::{DispatchError, RESOURCE_NOT_FOUND};
pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer, PROTOCOL_VERSION};
pub use server::{INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND, PARSE_ERROR};

// Re-export common types
pub use rmcp;
