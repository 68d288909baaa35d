//! End-to-end tests of the newline-delimited JSON-RPC loop
//!
//! The server reads from and writes to in-memory duplex pipes standing in for
//! stdin and stdout.

use naver_search_mcp::dispatcher::Dispatcher;
use naver_search_mcp::server::McpServer;
use naver_search_mcp::testing::MockSearchClient;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

const PIPE_CAPACITY: usize = 1 << 20;

/// Feed `input` lines to a server, close input, and collect every output line
async fn run_session(mock: MockSearchClient, input: &[String]) -> Vec<Value> {
    let dispatcher = Dispatcher::new(Arc::new(mock)).unwrap();
    let server = Arc::new(McpServer::new(Arc::new(dispatcher)));

    let (mut client_in, server_in) = tokio::io::duplex(PIPE_CAPACITY);
    let (server_out, mut client_out) = tokio::io::duplex(PIPE_CAPACITY);

    let serve = tokio::spawn(server.serve(server_in, server_out));

    for line in input {
        client_in.write_all(line.as_bytes()).await.unwrap();
        client_in.write_all(b"\n").await.unwrap();
    }
    drop(client_in);

    let mut output = String::new();
    timeout(Duration::from_secs(5), client_out.read_to_string(&mut output))
        .await
        .expect("server did not close output")
        .unwrap();

    serve.await.unwrap().unwrap();

    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("every output line is JSON"))
        .collect()
}

fn by_id(responses: &[Value]) -> HashMap<String, Value> {
    responses
        .iter()
        .map(|response| (response["id"].to_string(), response.clone()))
        .collect()
}

#[tokio::test]
async fn test_handshake_list_and_call() {
    let input = vec![
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
        json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {"name": "news-search", "arguments": {"query": "test"}}}).to_string(),
    ];

    let responses = run_session(MockSearchClient::new(), &input).await;

    // The notification gets no reply
    assert_eq!(responses.len(), 3);
    let responses = by_id(&responses);

    assert_eq!(responses["1"]["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(
        responses["2"]["result"]["tools"].as_array().unwrap().len(),
        17
    );
    assert_eq!(
        responses["3"]["result"],
        json!({"content": [{"type": "text", "text": "{\n  \"items\": []\n}"}], "isError": false})
    );
}

#[tokio::test]
async fn test_malformed_line_does_not_stop_the_loop() {
    let input = vec![
        "this is not json".to_string(),
        json!({"jsonrpc": "2.0", "id": "after", "method": "ping"}).to_string(),
    ];

    let responses = run_session(MockSearchClient::new(), &input).await;
    assert_eq!(responses.len(), 2);

    let responses = by_id(&responses);
    assert_eq!(responses["null"]["error"]["code"], -32700);
    assert_eq!(responses["\"after\""]["result"], json!({}));
}

#[tokio::test]
async fn test_blank_lines_are_ignored() {
    let input = vec![
        String::new(),
        "   ".to_string(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string(),
    ];

    let responses = run_session(MockSearchClient::new(), &input).await;
    assert_eq!(responses.len(), 1);
}

#[tokio::test]
async fn test_slow_call_does_not_block_later_requests() {
    let mock = MockSearchClient::new().delayed(Duration::from_millis(300));
    let input = vec![
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {"name": "web-search", "arguments": {"query": "slow"}}}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}).to_string(),
    ];

    let responses = run_session(mock, &input).await;

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 2, "ping should be answered first");
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["result"]["isError"], false);
}

#[tokio::test]
async fn test_in_flight_calls_finish_after_input_closes() {
    let mock = MockSearchClient::new().delayed(Duration::from_millis(100));
    let input: Vec<String> = (0..5)
        .map(|i| {
            json!({
                "jsonrpc": "2.0",
                "id": i,
                "method": "tools/call",
                "params": {"name": "blog-search", "arguments": {"query": format!("q{i}")}}
            })
            .to_string()
        })
        .collect();

    let responses = run_session(mock.clone(), &input).await;

    assert_eq!(responses.len(), 5);
    assert_eq!(mock.calls().await.len(), 5);
}

#[tokio::test]
async fn test_tool_errors_stay_inside_result() {
    let input = vec![
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {"name": "news-search", "arguments": {"query": "q"}}}).to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {"name": "news-search"}}).to_string(),
    ];

    let responses = run_session(MockSearchClient::with_failure("rate limited"), &input).await;
    let responses = by_id(&responses);

    assert_eq!(
        responses["1"]["result"]["content"][0]["text"],
        "Error: rate limited"
    );
    assert_eq!(
        responses["2"]["result"]["content"][0]["text"],
        "Error: Arguments are required"
    );
    assert!(responses["2"].get("error").is_none());
}
