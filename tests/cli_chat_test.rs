//! Integration tests for `bearing chat ask`.

mod common;

use common::{StubService, TestEnv, stdout_json};
use predicates::prelude::*;
use serde_json::json;

#[test]
fn test_chat_ask_answers() {
    let stub = StubService::outputs(json!({"answer": "Two tasks are overdue."}));
    let env = TestEnv::new();
    let output = env
        .bearing_at(&stub.base_url)
        .args(["chat", "ask", "What is overdue?"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["answered"], true);
    assert_eq!(json["answer"], "Two tasks are overdue.");
    assert_eq!(stub.requests()[0]["inputs"]["prompt"], "What is overdue?");
}

#[test]
fn test_chat_unauthorized_prints_diagnostic_and_fails() {
    let stub = StubService::status(401, json!({"message": "Invalid API key"}));
    let env = TestEnv::new();
    env.bearing_at(&stub.base_url)
        .args(["chat", "ask", "hello", "-H"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("API key authentication failed"));
}

#[test]
fn test_chat_messages_endpoint() {
    let stub = StubService::start(|path, _| match path {
        "/chat-messages" => (
            200,
            json!({"answer": "Hi there", "conversation_id": "conv-7", "message_id": "m-1"}),
        ),
        _ => (404, json!({"message": "not found"})),
    });
    let env = TestEnv::new();
    let output = env
        .bearing_at(&stub.base_url)
        .args(["--chat-endpoint", "chat-messages", "chat", "ask", "hi"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["answer"], "Hi there");
    assert_eq!(json["conversation_id"], "conv-7");
    assert_eq!(stub.requests()[0]["query"], "hi");
}
