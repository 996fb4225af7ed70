//! End-to-End tests for the MCP server
//!
//! Drives the full message loop over in-memory streams with the real schema,
//! real bcrypt and real YAML output.

use eib_config::EibSchema;
use eib_mcp::{McpServer, McpServerConfig};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

fn server() -> McpServer {
    let config = McpServerConfig {
        bcrypt_cost: 4,
        ..McpServerConfig::default()
    };
    McpServer::new(config, Arc::new(EibSchema::embedded()))
}

/// Feed `input` through the loop and return every response line, parsed
fn exchange(input: &str) -> Vec<Value> {
    let mut output = Vec::new();
    server()
        .serve(Cursor::new(input.as_bytes().to_vec()), &mut output)
        .unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.is_empty() || output.ends_with('\n'));
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn lines(messages: &[Value]) -> String {
    messages.iter().map(|m| format!("{}\n", m)).collect()
}

fn iso_arguments() -> Value {
    json!({
        "apiVersion": "1.0",
        "image": {
            "imageType": "iso",
            "arch": "x86_64",
            "baseImage": "x.iso",
            "outputImageName": "out"
        },
        "operatingSystem": {"isoConfiguration": {"installDevice": "/dev/sda"}}
    })
}

fn tools_call(id: i64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
}

// =============================================================================
// SESSION
// =============================================================================

#[test]
fn test_initialize_then_list() {
    let responses = exchange(&lines(&[
        json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {"protocolVersion": "2024-11-05"}}),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    ]));

    assert_eq!(responses.len(), 2);

    let init = &responses[0];
    assert_eq!(init["jsonrpc"], "2.0");
    assert_eq!(init["id"], 0);
    assert_eq!(init["result"]["protocolVersion"], "2024-11-05");
    assert!(init["result"]["capabilities"].get("tools").is_some());
    assert_eq!(init["result"]["serverInfo"]["name"], "eib-mcp");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "generate_config");
    assert_eq!(tools[0]["inputSchema"]["$schema"], "http://json-schema.org/draft-07/schema#");
}

#[test]
fn test_initialize_with_unusual_params() {
    let responses = exchange(&lines(&[json!({
        "jsonrpc": "2.0",
        "id": "init",
        "method": "initialize",
        "params": [1, 2, 3]
    })]));

    assert_eq!(responses[0]["id"], "init");
    assert!(responses[0]["result"]["protocolVersion"].is_string());
    assert!(responses[0]["result"]["capabilities"]["tools"].is_object());
}

#[test]
fn test_ping() {
    let responses = exchange("{\"jsonrpc\":\"2.0\",\"id\":9,\"method\":\"ping\"}\n");
    assert_eq!(responses, vec![json!({"jsonrpc": "2.0", "id": 9, "result": {}})]);
}

// =============================================================================
// GENERATE_CONFIG
// =============================================================================

#[test]
fn test_generate_iso_definition() {
    let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/call","params":{"name":"generate_config","arguments":{"apiVersion":"1.0","image":{"imageType":"iso","arch":"x86_64","baseImage":"x.iso","outputImageName":"out"},"operatingSystem":{"isoConfiguration":{"installDevice":"/dev/sda"}}}}}"#;
    let responses = exchange(&format!("{}\n", input));

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 1);

    let content = responses[0]["result"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["type"], "text");

    let yaml = content[0]["text"].as_str().unwrap();
    assert!(!yaml.contains("password"));
    let parsed: Value = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(parsed, iso_arguments());
}

#[test]
fn test_generate_hashes_passwords() {
    let mut arguments = iso_arguments();
    arguments["operatingSystem"]["users"] =
        json!([{"username": "root", "password": "s3cret"}]);

    let responses = exchange(&lines(&[tools_call(2, "generate_config", arguments)]));

    let yaml = responses[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(!yaml.contains("s3cret"));
    assert!(!yaml.contains("password:"));

    let parsed: Value = serde_yaml::from_str(yaml).unwrap();
    let hash = parsed["operatingSystem"]["users"][0]["encryptedPassword"]
        .as_str()
        .unwrap();
    assert!(bcrypt::verify("s3cret", hash).unwrap());
}

#[test]
fn test_generate_rejects_node_ip() {
    let mut arguments = iso_arguments();
    arguments["kubernetes"] = json!({
        "version": "v1.30.3+rke2r1",
        "nodes": [{"hostname": "node1", "ip": "192.168.122.50"}]
    });

    let responses = exchange(&lines(&[tools_call(3, "generate_config", arguments)]));

    let error = &responses[0]["error"];
    assert!(responses[0].get("result").is_none());
    assert_eq!(error["code"], -32000);

    let message = error["message"].as_str().unwrap();
    assert!(message.starts_with("configuration is invalid:"), "{}", message);
    assert!(message.contains("ip"), "{}", message);

    let violations = error["data"]["violations"].as_array().unwrap();
    assert!(violations
        .iter()
        .any(|v| v.as_str().unwrap().starts_with("/kubernetes/nodes/0")));
}

#[test]
fn test_generate_rejects_unresolved_chart_repository() {
    let mut arguments = iso_arguments();
    arguments["kubernetes"] = json!({
        "version": "v1.30.3+rke2r1",
        "helm": {
            "charts": [{"name": "metallb", "repositoryName": "missing", "version": "0.14.3"}],
            "repositories": [{"name": "suse-edge", "url": "oci://registry.suse.com/edge/3.1"}]
        }
    });

    let responses = exchange(&lines(&[tools_call(4, "generate_config", arguments)]));

    assert_eq!(responses[0]["error"]["code"], -32000);
    let message = responses[0]["error"]["message"].as_str().unwrap();
    assert!(message.contains("\"missing\""), "{}", message);
}

#[test]
fn test_unknown_tool() {
    let responses = exchange(&lines(&[tools_call(5, "unknown_tool", json!({}))]));

    assert_eq!(responses[0]["id"], 5);
    assert_eq!(responses[0]["error"]["code"], -32601);
}

#[test]
fn test_malformed_tool_call_params() {
    let responses = exchange(&lines(&[
        json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call"}),
        json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call", "params": "generate_config"}),
        json!({"jsonrpc": "2.0", "id": 8, "method": "tools/call", "params": {"name": "generate_config", "arguments": 12}}),
    ]));

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[2]["error"]["code"], -32602);
}

// =============================================================================
// FRAMING
// =============================================================================

#[test]
fn test_unknown_method_with_and_without_id() {
    let responses = exchange(&lines(&[
        json!({"jsonrpc": "2.0", "id": 10, "method": "resources/list"}),
        json!({"jsonrpc": "2.0", "method": "resources/list"}),
        json!({"jsonrpc": "2.0", "id": null, "method": "resources/list"}),
    ]));

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 10);
    assert_eq!(responses[0]["error"]["code"], -32601);
}

#[test]
fn test_malformed_line_does_not_stop_the_loop() {
    let input = "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"tools/li\n\
                 \n\
                 not json at all\n\
                 {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\r\n\
                 \r\n\
                 {\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"ping\"}";

    let responses = exchange(input);

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["id"], 2);
    assert_eq!(responses[1]["id"], 3);
}

#[test]
fn test_invalid_utf8_is_dropped() {
    let mut input = vec![0xc3, 0x28, b'\n'];
    input.extend_from_slice(b"{\"jsonrpc\":\"2.0\",\"id\":4,\"method\":\"ping\"}\n");

    let mut output = Vec::new();
    server().serve(Cursor::new(input), &mut output).unwrap();

    let output = String::from_utf8(output).unwrap();
    assert_eq!(output.lines().count(), 1);
    assert!(output.contains("\"id\":4"));
}

#[test]
fn test_responses_keep_request_order() {
    let requests: Vec<Value> = (0..5)
        .map(|id| json!({"jsonrpc": "2.0", "id": id, "method": "ping"}))
        .collect();

    let ids: Vec<Value> = exchange(&lines(&requests))
        .into_iter()
        .map(|r| r["id"].clone())
        .collect();

    assert_eq!(ids, (0..5).map(Value::from).collect::<Vec<_>>());
}

#[test]
fn test_empty_input() {
    assert!(exchange("").is_empty());
}
