#![allow(clippy::unwrap_used, clippy::expect_used)]

use agentmesh_core::MeshError;
use agentmesh_gateway::RegistryGateway;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[tokio::test]
async fn call_tool_returns_result_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "tools/call",
            "params": {"name": "health_check", "arguments": {}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"status": "ok", "indexedAgents": 104230}
        })))
        .mount(&server)
        .await;

    let gateway = RegistryGateway::new(format!("{}/mcp", server.uri()));
    let result = gateway
        .call_tool("health_check", serde_json::json!({}))
        .await
        .unwrap();

    assert_eq!(result["status"], "ok");
    assert_eq!(result["indexedAgents"], 104230);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let gateway = RegistryGateway::new(server.uri());
    let err = gateway
        .call_tool("search_agents", serde_json::json!({"query": "x"}))
        .await
        .unwrap_err();

    match err {
        MeshError::Transport { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn rpc_error_member_is_a_remote_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "agent not found"}
        })))
        .mount(&server)
        .await;

    let gateway = RegistryGateway::new(server.uri());
    let err = gateway
        .call_tool("get_agent", serde_json::json!({"agentId": "missing"}))
        .await
        .unwrap_err();

    match err {
        MeshError::RemoteProtocol(msg) => assert_eq!(msg, "agent not found"),
        other => panic!("expected RemoteProtocol, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_result_is_a_remote_protocol_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"jsonrpc": "2.0", "id": 1})),
        )
        .mount(&server)
        .await;

    let gateway = RegistryGateway::new(server.uri());
    let err = gateway
        .call_tool("health_check", serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, MeshError::RemoteProtocol(_)));
}

#[tokio::test]
async fn request_ids_are_strictly_increasing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 0,
            "result": {}
        })))
        .mount(&server)
        .await;

    let gateway = RegistryGateway::new(server.uri());
    for _ in 0..3 {
        gateway
            .call_tool("health_check", serde_json::json!({}))
            .await
            .unwrap();
    }

    let requests = server.received_requests().await.unwrap();
    let ids: Vec<u64> = requests
        .iter()
        .map(|r: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
            body["id"].as_u64().unwrap()
        })
        .collect();

    assert_eq!(ids, vec![1, 2, 3]);
}
