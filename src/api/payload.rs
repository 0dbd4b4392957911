//! Request bodies and response normalization for the workflow service.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::client::ApiError;

/// Blocking mode: the call returns once the workflow finishes.
pub const RESPONSE_MODE: &str = "blocking";

/// Body of `POST /workflows/run`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRunRequest {
    pub inputs: Map<String, Value>,
    pub response_mode: &'static str,
    pub user: String,
}

impl WorkflowRunRequest {
    pub fn new(inputs: Map<String, Value>, user: &str) -> Self {
        Self {
            inputs,
            response_mode: RESPONSE_MODE,
            user: user.to_string(),
        }
    }

    /// Inputs of `{action, ...params}`.
    pub fn action(action: &str, params: Map<String, Value>, user: &str) -> Self {
        let mut inputs = Map::new();
        inputs.insert("action".to_string(), Value::String(action.to_string()));
        inputs.extend(params);
        Self::new(inputs, user)
    }
}

/// Body of `POST /chat-messages`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessagesRequest {
    pub inputs: Map<String, Value>,
    pub query: String,
    pub response_mode: &'static str,
    /// Empty string starts a new conversation
    pub conversation_id: String,
    pub user: String,
}

/// Build a params map from key/value pairs.
pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Decode the payload of a workflow response.
///
/// Tried in order: `data.outputs.<key>`, `data.outputs.data`,
/// `data.outputs`, then the top-level `data`. A string candidate is parsed
/// as JSON first (workflows often emit their result as text).
pub fn extract<T: DeserializeOwned>(body: &Value, key: &str) -> Result<T, ApiError> {
    let mut candidates: Vec<&Value> = Vec::new();
    if let Some(outputs) = body.pointer("/data/outputs") {
        candidates.extend(outputs.get(key));
        candidates.extend(outputs.get("data"));
        candidates.push(outputs);
    }
    candidates.extend(body.get("data"));

    candidates
        .into_iter()
        .find_map(decode::<T>)
        .ok_or_else(|| ApiError::Decode(format!("no usable '{}' payload in workflow outputs", key)))
}

/// Read a string at the first of several JSON pointers that has one.
pub fn first_str<'a>(body: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| body.pointer(p))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    match value {
        Value::String(text) => serde_json::from_str(strip_code_fence(text)).ok(),
        Value::Null => None,
        other => serde_json::from_value(other.clone()).ok(),
    }
}

/// Drop a surrounding Markdown code fence (```json ... ```), if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Item {
        id: String,
    }

    fn outputs(value: Value) -> Value {
        json!({"data": {"outputs": value}})
    }

    #[test]
    fn test_action_request_shape() {
        let req = WorkflowRunRequest::action("list_tasks", params([("filters", json!({}))]), "u1");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "inputs": {"action": "list_tasks", "filters": {}},
                "response_mode": "blocking",
                "user": "u1"
            })
        );
    }

    #[test]
    fn test_extract_prefers_named_key() {
        let body = outputs(json!({"tasks": [{"id": "a"}], "data": [{"id": "b"}]}));
        let items: Vec<Item> = extract(&body, "tasks").unwrap();
        assert_eq!(items, vec![Item { id: "a".into() }]);
    }

    #[test]
    fn test_extract_falls_through_to_data_and_outputs() {
        let body = outputs(json!({"data": [{"id": "b"}]}));
        let items: Vec<Item> = extract(&body, "tasks").unwrap();
        assert_eq!(items[0].id, "b");

        let body = outputs(json!({"id": "c"}));
        let item: Item = extract(&body, "task").unwrap();
        assert_eq!(item.id, "c");

        let body = json!({"success": true, "data": [{"id": "d"}]});
        let items: Vec<Item> = extract(&body, "tasks").unwrap();
        assert_eq!(items[0].id, "d");
    }

    #[test]
    fn test_extract_parses_json_strings() {
        let body = outputs(json!({"tasks": "[{\"id\": \"s\"}]"}));
        let items: Vec<Item> = extract(&body, "tasks").unwrap();
        assert_eq!(items[0].id, "s");

        let fenced = "```json\n[{\"id\": \"f\"}]\n```";
        let body = outputs(json!({ "tasks": fenced }));
        let items: Vec<Item> = extract(&body, "tasks").unwrap();
        assert_eq!(items[0].id, "f");
    }

    #[test]
    fn test_extract_reports_decode_error() {
        let body = outputs(json!({"text": "I could not do that"}));
        let err = extract::<Vec<Item>>(&body, "tasks").unwrap_err();
        assert!(matches!(err, ApiError::Decode(ref msg) if msg.contains("tasks")));
    }

    #[test]
    fn test_first_str_skips_blank() {
        let body = json!({"data": {"outputs": {"text": " ", "answer": "hi"}}});
        let got = first_str(&body, &["/data/outputs/text", "/data/outputs/answer"]);
        assert_eq!(got, Some("hi"));
        assert_eq!(first_str(&body, &["/missing"]), None);
    }
}
