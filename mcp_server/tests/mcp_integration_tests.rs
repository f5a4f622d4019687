//! Integration tests for MCP server request/response cycle.
//!
//! Tests the full MCP protocol flow including initialization, tool and
//! prompt discovery, tool calls against real manifests on disk, and pod
//! operations against an in-memory cluster.

use std::sync::Arc;

use cluster_client::MockPodClient;
use k8s_shared_types::{PodSummary, ToolProfile};
use manifest_accessor::K8sManager;
use mcp_server::{
    JsonRpcRequest, JsonRpcResponse, McpServer, INVALID_PARAMS, METHOD_NOT_FOUND,
    RESOURCE_NOT_FOUND,
};
use serde_json::{json, Value};

// ============================================================================
// Test Mocks
// ============================================================================

mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use k8s_shared_types::{Result, TextContent};
    use manifest_accessor::Accessor;

    /// Accessor that records how often it was reached.
    #[derive(Default)]
    pub struct CountingAccessor {
        calls: AtomicUsize,
    }

    impl CountingAccessor {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn hit(&self, text: String) -> Result<Vec<TextContent>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![TextContent::new(text)])
        }
    }

    #[async_trait]
    impl Accessor for CountingAccessor {
        async fn read_manifest_file(&self, path: &str) -> Result<Vec<TextContent>> {
            self.hit(format!("file:{}", path))
        }

        async fn read_manifest_directory(&self, path: &str) -> Result<Vec<TextContent>> {
            self.hit(format!("dir:{}", path))
        }

        async fn list_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
            self.hit(format!("pods:{}", namespace))
        }

        async fn delete_pod(&self, name: &str, namespace: &str) -> Result<Vec<TextContent>> {
            self.hit(format!("delete:{}/{}", namespace, name))
        }

        async fn delete_all_pods(&self, namespace: &str) -> Result<Vec<TextContent>> {
            self.hit(format!("delete-all:{}", namespace))
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Create a server over a real manager with an in-memory cluster.
fn create_test_server(pods: MockPodClient) -> McpServer<K8sManager> {
    McpServer::new(
        K8sManager::with_pod_client(Arc::new(pods)),
        ToolProfile::Full,
    )
}

/// Create a server over a counting accessor, keeping a handle to it.
fn create_counting_server(
    profile: ToolProfile,
) -> (McpServer<Arc<mock::CountingAccessor>>, Arc<mock::CountingAccessor>) {
    let accessor = Arc::new(mock::CountingAccessor::default());
    (McpServer::new(Arc::clone(&accessor), profile), accessor)
}

/// Create a JSON-RPC request.
fn make_request(method: &str, params: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(1)),
        method: method.to_string(),
        params,
    }
}

fn call_tool(name: &str, arguments: Value) -> JsonRpcRequest {
    make_request("tools/call", json!({ "name": name, "arguments": arguments }))
}

fn get_prompt(name: &str, arguments: Value) -> JsonRpcRequest {
    make_request("prompts/get", json!({ "name": name, "arguments": arguments }))
}

/// Assert a response is successful and extract result.
fn assert_success(response: &JsonRpcResponse) -> &Value {
    assert!(
        response.error.is_none(),
        "Expected success but got error: {:?}",
        response.error
    );
    response
        .result
        .as_ref()
        .expect("Expected result in successful response")
}

/// Assert a response is an error with the given code and kind.
fn assert_error(response: &JsonRpcResponse, expected_code: i32, expected_kind: &str) {
    let error = response.error.as_ref().expect("Expected error response");
    assert_eq!(
        error.code, expected_code,
        "Expected error code {} but got {}",
        expected_code, error.code
    );
    let kind = error
        .data
        .as_ref()
        .and_then(|d| d.get("kind"))
        .and_then(Value::as_str);
    assert_eq!(kind, Some(expected_kind));
}

/// Text of every content item in a tool result.
fn content_texts(result: &Value) -> Vec<String> {
    result["content"]
        .as_array()
        .expect("content array")
        .iter()
        .map(|item| {
            assert_eq!(item["type"], "text");
            item["text"].as_str().unwrap().to_string()
        })
        .collect()
}

// ============================================================================
// Initialization Tests
// ============================================================================

#[tokio::test]
async fn test_initialize() {
    let server = create_test_server(MockPodClient::new());

    let request = make_request(
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }),
    );

    let response = server.handle_request(request).await;
    let result = assert_success(&response);

    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert!(result["capabilities"]["tools"].is_object());
    assert!(result["capabilities"]["prompts"].is_object());
    assert_eq!(result["serverInfo"]["name"], "k8s-manager-mcp");
}

#[tokio::test]
async fn test_initialize_minimal_params() {
    let server = create_test_server(MockPodClient::new());

    let response = server.handle_request(make_request("initialize", json!({}))).await;
    let result = assert_success(&response);

    assert_eq!(result["protocolVersion"], "2024-11-05");
}

#[tokio::test]
async fn test_initialized_notification() {
    let server = create_test_server(MockPodClient::new());

    for method in ["initialized", "notifications/initialized"] {
        let response = server.handle_request(make_request(method, json!({}))).await;
        assert_success(&response);
    }
}

#[tokio::test]
async fn test_ping() {
    let server = create_test_server(MockPodClient::new());

    let response = server.handle_request(make_request("ping", json!({}))).await;
    assert_eq!(assert_success(&response), &json!({}));
}

// ============================================================================
// Discovery Tests
// ============================================================================

#[tokio::test]
async fn test_tools_list() {
    let server = create_test_server(MockPodClient::new());

    let response = server.handle_request(make_request("tools/list", json!({}))).await;
    let result = assert_success(&response);
    let tools = result["tools"].as_array().unwrap();

    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "get_files_in_directory",
            "read_k8s_yaml",
            "get_pods_by_namespace",
            "delete_namespace_pod",
            "delete_namespace_pods",
        ]
    );

    for tool in tools {
        assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
        assert_eq!(tool["inputSchema"]["type"], "object");
    }

    let read = &tools[1];
    assert_eq!(read["inputSchema"]["required"], json!(["full_file_path"]));
}

#[tokio::test]
async fn test_prompts_list() {
    let server = create_test_server(MockPodClient::new());

    let response = server.handle_request(make_request("prompts/list", json!({}))).await;
    let result = assert_success(&response);
    let prompts = result["prompts"].as_array().unwrap();

    let names: Vec<&str> = prompts.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec!["get-file", "list-folder", "get-pods", "delete-pod", "delete-pods"]
    );

    assert_eq!(prompts[0]["arguments"][0]["name"], "full_file_path");
    assert_eq!(prompts[0]["arguments"][0]["required"], false);
    assert_eq!(prompts[1]["arguments"][0]["required"], true);

    let delete_pod_args: Vec<&str> = prompts[3]["arguments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(delete_pod_args, vec!["name", "namespace"]);
}

#[tokio::test]
async fn test_manifests_profile_discovery() {
    let (server, _) = create_counting_server(ToolProfile::Manifests);

    let response = server.handle_request(make_request("tools/list", json!({}))).await;
    let tools = assert_success(&response)["tools"].as_array().unwrap().len();
    assert_eq!(tools, 2);

    let response = server.handle_request(make_request("prompts/list", json!({}))).await;
    let prompts = assert_success(&response)["prompts"].as_array().unwrap().len();
    assert_eq!(prompts, 2);
}

// ============================================================================
// Manifest Tool Tests
// ============================================================================

#[tokio::test]
async fn test_directory_keeps_only_manifests() {
    let dir = tempfile::TempDir::new().unwrap();
    let cfg = dir.path().join("cfg");
    std::fs::create_dir(&cfg).unwrap();
    std::fs::write(cfg.join("a.yaml"), "replicas: 3\n").unwrap();
    std::fs::write(cfg.join("b.txt"), "replicas: 4\n").unwrap();

    let server = create_test_server(MockPodClient::new());
    let response = server
        .handle_request(call_tool(
            "get_files_in_directory",
            json!({ "folder_path": cfg.to_str().unwrap() }),
        ))
        .await;

    let texts = content_texts(assert_success(&response));
    assert_eq!(texts, vec!["a.yaml:'{'replicas': 3}'".to_string()]);
}

#[tokio::test]
async fn test_directory_counts_yaml_and_yml() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("svc.yml"), "kind: Service\n").unwrap();
    std::fs::write(dir.path().join("deploy.yaml"), "kind: Deployment\n").unwrap();
    std::fs::write(dir.path().join("UPPER.YAML"), "kind: Pod\n").unwrap();
    std::fs::write(dir.path().join("notes.md"), "# notes\n").unwrap();

    let server = create_test_server(MockPodClient::new());
    let response = server
        .handle_request(call_tool(
            "get_files_in_directory",
            json!({ "folder_path": dir.path().to_str().unwrap() }),
        ))
        .await;

    let texts = content_texts(assert_success(&response));
    assert_eq!(
        texts,
        vec![
            "deploy.yaml:'{'kind': 'Deployment'}'".to_string(),
            "svc.yml:'{'kind': 'Service'}'".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_read_single_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("pod.yaml");
    std::fs::write(&path, "apiVersion: v1\nkind: Pod\n").unwrap();
    let empty = dir.path().join("empty.yaml");
    std::fs::write(&empty, "").unwrap();

    let server = create_test_server(MockPodClient::new());

    let response = server
        .handle_request(call_tool(
            "read_k8s_yaml",
            json!({ "full_file_path": path.to_str().unwrap() }),
        ))
        .await;
    let texts = content_texts(assert_success(&response));
    assert_eq!(texts, vec!["pod.yaml:'{'apiVersion': 'v1', 'kind': 'Pod'}'".to_string()]);

    let response = server
        .handle_request(call_tool(
            "read_k8s_yaml",
            json!({ "full_file_path": empty.to_str().unwrap() }),
        ))
        .await;
    let texts = content_texts(assert_success(&response));
    assert_eq!(texts, vec!["empty.yaml:''".to_string()]);
}

#[tokio::test]
async fn test_read_missing_file_is_not_found() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("absent.yaml");

    let server = create_test_server(MockPodClient::new());
    let response = server
        .handle_request(call_tool(
            "read_k8s_yaml",
            json!({ "full_file_path": path.to_str().unwrap() }),
        ))
        .await;

    assert_error(&response, RESOURCE_NOT_FOUND, "not_found");
}

#[tokio::test]
async fn test_directory_on_file_is_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("a.yaml");
    std::fs::write(&path, "a: 1\n").unwrap();

    let server = create_test_server(MockPodClient::new());
    let response = server
        .handle_request(call_tool(
            "get_files_in_directory",
            json!({ "folder_path": path.to_str().unwrap() }),
        ))
        .await;

    assert_error(&response, INVALID_PARAMS, "not_a_directory");
}

#[tokio::test]
async fn test_malformed_yaml_is_parse_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "key: [unclosed\n").unwrap();

    let server = create_test_server(MockPodClient::new());
    let response = server
        .handle_request(call_tool(
            "read_k8s_yaml",
            json!({ "full_file_path": path.to_str().unwrap() }),
        ))
        .await;

    assert_error(&response, mcp_server::INTERNAL_ERROR, "parse_error");
}

// ============================================================================
// Pod Tool Tests
// ============================================================================

fn prod_pods() -> MockPodClient {
    MockPodClient::with_pods(vec![
        PodSummary::new("web-1", "prod", Some("10.0.0.1")),
        PodSummary::new("web-2", "prod", Some("10.0.0.2")),
        PodSummary::new("db-0", "staging", None),
    ])
}

#[tokio::test]
async fn test_pods_by_namespace() {
    let server = create_test_server(prod_pods());

    let response = server
        .handle_request(call_tool("get_pods_by_namespace", json!({ "namespace": "prod" })))
        .await;

    let texts = content_texts(assert_success(&response));
    assert_eq!(texts, vec!["web-1prod10.0.0.1", "web-2prod10.0.0.2"]);
}

#[tokio::test]
async fn test_delete_one_pod() {
    let pods = prod_pods();
    let server = create_test_server(pods.clone());

    let response = server
        .handle_request(call_tool(
            "delete_namespace_pod",
            json!({ "name": "web-1", "namespace": "prod" }),
        ))
        .await;

    let texts = content_texts(assert_success(&response));
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Successfully deleted pod: web-1 with response: "));
    assert_eq!(pods.pod_count().await, 2);
}

#[tokio::test]
async fn test_delete_missing_pod_is_cluster_error() {
    let server = create_test_server(prod_pods());

    let response = server
        .handle_request(call_tool(
            "delete_namespace_pod",
            json!({ "name": "ghost", "namespace": "prod" }),
        ))
        .await;

    assert_error(&response, mcp_server::INTERNAL_ERROR, "cluster_error");
}

#[tokio::test]
async fn test_delete_all_pods_in_namespace() {
    let pods = prod_pods();
    let server = create_test_server(pods.clone());

    let response = server
        .handle_request(call_tool("delete_namespace_pods", json!({ "namespace": "prod" })))
        .await;

    let texts = content_texts(assert_success(&response));
    assert_eq!(texts, vec!["Successfully deleted pods in namespace: prod"]);
    assert_eq!(pods.pod_count().await, 1);
    assert_eq!(pods.delete_calls(), 2);
}

// ============================================================================
// Dispatch Rejection Tests
// ============================================================================

#[tokio::test]
async fn test_tools_call_unknown_tool() {
    let (server, accessor) = create_counting_server(ToolProfile::Full);

    let response = server
        .handle_request(call_tool("unknown_tool", json!({})))
        .await;

    assert_error(&response, METHOD_NOT_FOUND, "unknown_tool");
    assert_eq!(accessor.calls(), 0);
}

#[tokio::test]
async fn test_tools_call_missing_name() {
    let (server, accessor) = create_counting_server(ToolProfile::Full);

    let response = server
        .handle_request(make_request("tools/call", json!({ "arguments": {} })))
        .await;

    let error = response.error.expect("Expected error response");
    assert_eq!(error.code, INVALID_PARAMS);
    assert_eq!(accessor.calls(), 0);
}

#[tokio::test]
async fn test_tools_call_schema_is_enforced() {
    let (server, accessor) = create_counting_server(ToolProfile::Full);

    let response = server
        .handle_request(call_tool("delete_namespace_pod", json!({ "namespace": "prod" })))
        .await;
    assert_error(&response, INVALID_PARAMS, "invalid_arguments");

    let response = server
        .handle_request(make_request(
            "tools/call",
            json!({ "name": "get_pods_by_namespace" }),
        ))
        .await;
    assert_error(&response, INVALID_PARAMS, "invalid_arguments");

    assert_eq!(accessor.calls(), 0);
}

#[tokio::test]
async fn test_pod_tools_hidden_in_manifests_profile() {
    let (server, accessor) = create_counting_server(ToolProfile::Manifests);

    let response = server
        .handle_request(call_tool("delete_namespace_pods", json!({ "namespace": "prod" })))
        .await;

    assert_error(&response, METHOD_NOT_FOUND, "unknown_tool");
    assert_eq!(accessor.calls(), 0);

    let response = server
        .handle_request(call_tool("read_k8s_yaml", json!({ "full_file_path": "/tmp/a.yaml" })))
        .await;
    assert_eq!(content_texts(assert_success(&response)), vec!["file:/tmp/a.yaml"]);
    assert_eq!(accessor.calls(), 1);
}

// ============================================================================
// Prompt Tests
// ============================================================================

#[tokio::test]
async fn test_get_prompt_delete_pod() {
    let (server, accessor) = create_counting_server(ToolProfile::Full);

    let response = server
        .handle_request(get_prompt(
            "delete-pod",
            json!({ "name": "web-1", "namespace": "prod" }),
        ))
        .await;
    let result = assert_success(&response);

    assert_eq!(result["description"], "Delete pod with the given name: web-1");
    let messages = result["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    assert_eq!(
        messages[0]["content"]["text"],
        "Delete the pod with the given <name>web-1</name> and <namespace>prod</namespace>."
    );
    assert_eq!(accessor.calls(), 0);
}

#[tokio::test]
async fn test_get_prompt_delete_pod_missing_arguments() {
    let (server, _) = create_counting_server(ToolProfile::Full);

    for arguments in [
        json!({ "name": "web-1" }),
        json!({ "namespace": "prod" }),
        json!({}),
    ] {
        let response = server.handle_request(get_prompt("delete-pod", arguments)).await;
        assert_error(&response, INVALID_PARAMS, "missing_argument");
    }

    let response = server
        .handle_request(make_request("prompts/get", json!({ "name": "delete-pod" })))
        .await;
    assert_error(&response, INVALID_PARAMS, "missing_argument");
}

#[tokio::test]
async fn test_get_prompt_get_file_needs_its_argument() {
    let (server, _) = create_counting_server(ToolProfile::Manifests);

    let response = server.handle_request(get_prompt("get-file", json!({}))).await;
    assert_error(&response, INVALID_PARAMS, "missing_argument");

    let response = server
        .handle_request(get_prompt("get-file", json!({ "full_file_path": "/srv/app.yaml" })))
        .await;
    let result = assert_success(&response);
    assert_eq!(
        result["description"],
        "Kubernetes configuration exploration template for /srv/app.yaml"
    );
    let text = result["messages"][0]["content"]["text"].as_str().unwrap();
    assert!(text.contains("<full_file_path>\n/srv/app.yaml\n</full_file_path>"));
}

#[tokio::test]
async fn test_get_prompt_unknown() {
    let (server, _) = create_counting_server(ToolProfile::Full);

    let response = server
        .handle_request(get_prompt("explain-cluster", json!({})))
        .await;
    assert_error(&response, METHOD_NOT_FOUND, "unknown_prompt");
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[tokio::test]
async fn test_unknown_method() {
    let server = create_test_server(MockPodClient::new());

    let response = server
        .handle_request(make_request("resources/list", json!({})))
        .await;
    let error = response.error.expect("Expected error response");
    assert_eq!(error.code, METHOD_NOT_FOUND);
}

#[tokio::test]
async fn test_request_id_preserved() {
    let server = create_test_server(MockPodClient::new());

    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!(42)),
        method: "ping".to_string(),
        params: json!({}),
    };
    let response = server.handle_request(request).await;
    assert_eq!(response.id, Some(json!(42)));

    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(json!("request-123")),
        method: "tools/call".to_string(),
        params: json!({ "name": "nope" }),
    };
    let response = server.handle_request(request).await;
    assert_eq!(response.id, Some(json!("request-123")));
}

#[tokio::test]
async fn test_null_request_id() {
    let server = create_test_server(MockPodClient::new());

    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: None,
        method: "ping".to_string(),
        params: json!({}),
    };

    let response = server.handle_request(request).await;
    assert!(response.id.is_none());
}

// ============================================================================
// Full Protocol Flow Test
// ============================================================================

#[tokio::test]
async fn test_full_mcp_flow() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("web.yaml"), "kind: Deployment\nspec:\n  replicas: 2\n")
        .unwrap();
    let pods = prod_pods();
    let server = create_test_server(pods.clone());

    // 1. Initialize
    let init_response = server
        .handle_request(make_request(
            "initialize",
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "assistant", "version": "1.0.0" }
            }),
        ))
        .await;
    assert_eq!(assert_success(&init_response)["protocolVersion"], "2024-11-05");

    // 2. Send initialized notification
    let _ = server
        .handle_request(make_request("notifications/initialized", json!({})))
        .await;

    // 3. Render a prompt for the folder
    let folder = dir.path().to_str().unwrap();
    let prompt_response = server
        .handle_request(get_prompt("list-folder", json!({ "folder_path": folder })))
        .await;
    assert_success(&prompt_response);

    // 4. Read the folder
    let read_response = server
        .handle_request(call_tool("get_files_in_directory", json!({ "folder_path": folder })))
        .await;
    assert_eq!(
        content_texts(assert_success(&read_response)),
        vec!["web.yaml:'{'kind': 'Deployment', 'spec': {'replicas': 2}}'"]
    );

    // 5. List then clear the namespace
    let list_response = server
        .handle_request(call_tool("get_pods_by_namespace", json!({ "namespace": "prod" })))
        .await;
    assert_eq!(content_texts(assert_success(&list_response)).len(), 2);

    let delete_response = server
        .handle_request(call_tool("delete_namespace_pods", json!({ "namespace": "prod" })))
        .await;
    assert_success(&delete_response);

    let list_response = server
        .handle_request(call_tool("get_pods_by_namespace", json!({ "namespace": "prod" })))
        .await;
    assert!(content_texts(assert_success(&list_response)).is_empty());
    assert_eq!(pods.list_calls(), 3);
}
