//! MCP server for the Kubernetes manifest and pod operations.
//!
//! Hand-rolled JSON-RPC 2.0 over newline-delimited stdio. One request is
//! handled at a time; the server keeps no state between requests.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, Implementation};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn, Instrument};

use k8s_shared_types::ToolProfile;
use manifest_accessor::Accessor;

use crate::error::DispatchError;
use crate::prompts::{prompts_for_profile, PromptName};
use crate::tools::{
    parse_input, DeletePodInput, DirectoryInput, NamespaceInput, ReadManifestInput,
    ToolDefinitions, ToolName,
};

/// Protocol revision spoken by this server.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server exposing manifest reads and pod management.
///
/// The active [`ToolProfile`] decides which tools and prompts are registered.
/// Names outside the profile are reported as unknown.
pub struct McpServer<A>
where
    A: Accessor + 'static,
{
    accessor: Arc<A>,
    profile: ToolProfile,
}

impl<A> McpServer<A>
where
    A: Accessor + 'static,
{
    /// Create a new MCP server over the given accessor.
    pub fn new(accessor: A, profile: ToolProfile) -> Self {
        Self::with_shared(Arc::new(accessor), profile)
    }

    /// Create a server from an accessor that is shared elsewhere.
    pub fn with_shared(accessor: Arc<A>, profile: ToolProfile) -> Self {
        Self { accessor, profile }
    }

    pub fn profile(&self) -> ToolProfile {
        self.profile
    }

    /// Get server info for MCP initialization.
    pub fn server_info() -> Implementation {
        Implementation {
            name: "k8s-manager-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: Some("Kubernetes Manager".to_string()),
            website_url: None,
            icons: None,
        }
    }

    // === Tool and prompt dispatch ===

    /// Run one tool against the accessor.
    ///
    /// Unknown names and arguments that do not match the tool's input schema
    /// are rejected before the accessor is called.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<CallToolResult, DispatchError> {
        let tool: ToolName = name.parse()?;
        if !tool.is_available(self.profile) {
            return Err(DispatchError::UnknownTool(name.to_string()));
        }

        let items = match tool {
            ToolName::ReadK8sYaml => {
                let input: ReadManifestInput = parse_input(tool, arguments)?;
                self.accessor.read_manifest_file(&input.full_file_path).await?
            }
            ToolName::GetFilesInDirectory => {
                let input: DirectoryInput = parse_input(tool, arguments)?;
                self.accessor
                    .read_manifest_directory(&input.folder_path)
                    .await?
            }
            ToolName::GetPodsByNamespace => {
                let input: NamespaceInput = parse_input(tool, arguments)?;
                self.accessor.list_pods(&input.namespace).await?
            }
            ToolName::DeleteNamespacePod => {
                let input: DeletePodInput = parse_input(tool, arguments)?;
                self.accessor
                    .delete_pod(&input.name, &input.namespace)
                    .await?
            }
            ToolName::DeleteNamespacePods => {
                let input: NamespaceInput = parse_input(tool, arguments)?;
                self.accessor.delete_all_pods(&input.namespace).await?
            }
        };

        debug!(tool = %tool, items = items.len(), "Tool completed");
        Ok(CallToolResult::success(
            items.into_iter().map(|item| Content::text(item.text)).collect(),
        ))
    }

    /// Render one prompt.
    pub fn get_prompt(
        &self,
        name: &str,
        arguments: Option<&HashMap<String, String>>,
    ) -> Result<rmcp::model::GetPromptResult, DispatchError> {
        let prompt: PromptName = name.parse()?;
        if !prompt.is_available(self.profile) {
            return Err(DispatchError::UnknownPrompt(name.to_string()));
        }
        prompt.render(arguments)
    }
}

// ============================================================================
// JSON-RPC Types
// ============================================================================

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID (absent for notifications)
    #[serde(default)]
    pub id: Option<Value>,
    /// Method name
    pub method: String,
    /// Parameters (optional)
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// A request without an id expects no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,
    /// Request ID (null for notifications)
    pub id: Option<Value>,
    /// Result (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i32,
    /// Error message
    pub message: String,
    /// Additional data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Create an error response with data.
    pub fn error_with_data(
        id: Option<Value>,
        code: i32,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: Some(data),
            }),
        }
    }
}

// Standard JSON-RPC error codes
pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;

// ============================================================================
// MCP Protocol Implementation
// ============================================================================

impl<A> McpServer<A>
where
    A: Accessor + 'static,
{
    /// Handle an incoming JSON-RPC request.
    ///
    /// Always produces a response; the transport drops responses to
    /// notifications.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let span = observability::request_span!(request.method);
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        debug!(method = %request.method, "Handling MCP request");

        if request.jsonrpc != "2.0" {
            warn!(version = %request.jsonrpc, "Unsupported JSON-RPC version");
            return JsonRpcResponse::error(
                request.id,
                INVALID_REQUEST,
                format!("Unsupported JSON-RPC version: {}", request.jsonrpc),
            );
        }

        match request.method.as_str() {
            // MCP Protocol Methods
            "initialize" => self.handle_initialize(request.id, request.params).await,
            "initialized" | "notifications/initialized" => {
                self.handle_initialized(request.id).await
            }
            "ping" => self.handle_ping(request.id).await,

            // Tool Methods
            "tools/list" => self.handle_tools_list(request.id).await,
            "tools/call" => self.handle_tools_call(request.id, request.params).await,

            // Prompt Methods
            "prompts/list" => self.handle_prompts_list(request.id).await,
            "prompts/get" => self.handle_prompts_get(request.id, request.params).await,

            // Unknown method
            _ => {
                warn!(method = %request.method, "Unknown method");
                JsonRpcResponse::error(
                    request.id,
                    METHOD_NOT_FOUND,
                    format!("Method not found: {}", request.method),
                )
            }
        }
    }

    /// Handle initialize request.
    async fn handle_initialize(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct InitializeParams {
            #[serde(default)]
            protocol_version: Option<String>,
            #[serde(default)]
            client_info: Option<Value>,
        }

        let params: InitializeParams = match params {
            Value::Null => InitializeParams {
                protocol_version: None,
                client_info: None,
            },
            other => match serde_json::from_value(other) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        INVALID_PARAMS,
                        format!("Invalid params: {}", e),
                    );
                }
            },
        };

        let server_info = Self::server_info();
        let result = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "prompts": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": server_info.name,
                "version": server_info.version
            }
        });

        info!(
            client_version = params.protocol_version.as_deref().unwrap_or("<unset>"),
            client = ?params.client_info,
            profile = %self.profile,
            "MCP server initialized"
        );
        JsonRpcResponse::success(id, result)
    }

    /// Handle initialized notification.
    async fn handle_initialized(&self, id: Option<Value>) -> JsonRpcResponse {
        debug!("Client sent initialized notification");
        JsonRpcResponse::success(id, json!({}))
    }

    /// Handle ping request.
    async fn handle_ping(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({}))
    }

    /// Handle tools/list request.
    async fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tool_defs = ToolDefinitions::for_profile(self.profile);
        let tools: Vec<Value> = tool_defs
            .tools
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        #[derive(Debug, Deserialize)]
        struct ToolCallParams {
            name: String,
            #[serde(default)]
            arguments: Value,
        }

        let params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
        };

        debug!(tool = %params.name, arguments = %params.arguments, "Calling tool");

        match self.call_tool(&params.name, params.arguments).await {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
            },
            Err(e) => {
                log_dispatch_failure(&params.name, &e);
                e.into_response(id)
            }
        }
    }

    /// Handle prompts/list request.
    async fn handle_prompts_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let prompts: Vec<Value> = prompts_for_profile(self.profile)
            .iter()
            .map(PromptName::to_listing)
            .collect();

        JsonRpcResponse::success(id, json!({ "prompts": prompts }))
    }

    /// Handle prompts/get request.
    async fn handle_prompts_get(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        #[derive(Debug, Deserialize)]
        struct PromptGetParams {
            name: String,
            #[serde(default)]
            arguments: Option<HashMap<String, String>>,
        }

        let params: PromptGetParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    format!("Invalid params: {}", e),
                );
            }
        };

        debug!(prompt = %params.name, arguments = ?params.arguments, "Rendering prompt");

        match self.get_prompt(&params.name, params.arguments.as_ref()) {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
            },
            Err(e) => {
                log_dispatch_failure(&params.name, &e);
                e.into_response(id)
            }
        }
    }

    /// Serve newline-delimited JSON-RPC from `reader`, writing responses to
    /// `writer` until the input ends.
    pub async fn serve<R, W>(
        &self,
        reader: R,
        mut writer: W,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            debug!(request = %line, "Received request");

            let request: JsonRpcRequest = match serde_json::from_str(&line) {
                Ok(r) => r,
                Err(e) => {
                    error!(error = %e, "Failed to parse request");
                    let response =
                        JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e));
                    write_response(&mut writer, &response).await?;
                    continue;
                }
            };

            let notification = request.is_notification();
            let response = self.handle_request(request).await;
            if notification {
                debug!("Notification handled, no response sent");
                continue;
            }

            write_response(&mut writer, &response).await?;
        }

        Ok(())
    }

    /// Run the MCP server over stdio.
    pub async fn serve_stdio(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let reader = tokio::io::BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        info!(profile = %self.profile, "MCP server listening on stdio");
        self.serve(reader, writer).await?;
        info!("MCP server shutdown");
        Ok(())
    }
}

async fn write_response<W>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
where
    W: AsyncWrite + Unpin,
{
    let response_json = serde_json::to_string(response)?;
    debug!(response = %response_json, "Sending response");

    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

fn log_dispatch_failure(name: &str, err: &DispatchError) {
    match err {
        DispatchError::Accessor(_) => error!(name = %name, error = %err, "Operation failed"),
        _ => warn!(name = %name, error = %err, "Request rejected"),
    }
}
