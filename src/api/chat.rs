//! Assistant messages.
//!
//! Unlike the other groups, chat never substitutes sample answers. A failed
//! call still yields a [`ChatReply`], whose answer is a diagnostic that
//! tells the user what to check.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value, json};

use super::DashboardApi;
use super::payload::{ChatMessagesRequest, RESPONSE_MODE, WorkflowRunRequest, first_str};
use crate::client::ApiError;
use crate::config::{API_KEY_ENV, BASE_URL_ENV, ChatEndpoint};
use crate::models::{ChatReply, parse_timestamp};
use crate::{Error, Result};

/// Context used when the caller does not name one.
pub const DEFAULT_CONTEXT: &str = "project_management";

/// Answer used when a successful response carries no text.
pub const NO_ANSWER: &str = "Sorry, I could not understand that request.";

/// One message to the assistant.
#[derive(Debug, Clone)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    /// Page context, e.g. `task_management`
    pub context: &'a str,
    /// Conversation to continue, if any
    pub conversation_id: Option<&'a str>,
    /// Extra workflow inputs (e.g. the current task count)
    pub extra_inputs: Map<String, Value>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            context: DEFAULT_CONTEXT,
            conversation_id: None,
            extra_inputs: Map::new(),
        }
    }

    pub fn context(mut self, context: &'a str) -> Self {
        self.context = context;
        self
    }

    pub fn conversation(mut self, conversation_id: Option<&'a str>) -> Self {
        self.conversation_id = conversation_id;
        self
    }

    pub fn input(mut self, key: &str, value: Value) -> Self {
        self.extra_inputs.insert(key.to_string(), value);
        self
    }
}

/// Outcome of a chat call. Both arms carry a displayable reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Answered(ChatReply),
    Failed { error: ApiError, reply: ChatReply },
}

impl ChatOutcome {
    pub fn reply(&self) -> &ChatReply {
        match self {
            ChatOutcome::Answered(reply) | ChatOutcome::Failed { reply, .. } => reply,
        }
    }

    pub fn into_reply(self) -> ChatReply {
        match self {
            ChatOutcome::Answered(reply) | ChatOutcome::Failed { reply, .. } => reply,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ChatOutcome::Answered(_) => None,
            ChatOutcome::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, ChatOutcome::Answered(_))
    }
}

pub struct ChatApi<'a> {
    api: &'a DashboardApi,
}

impl<'a> ChatApi<'a> {
    pub(crate) fn new(api: &'a DashboardApi) -> Self {
        Self { api }
    }

    /// Send a message using the configured wire shape.
    ///
    /// Only an empty message is an `Err`; remote failures come back as
    /// [`ChatOutcome::Failed`].
    pub async fn send(&self, request: ChatRequest<'_>) -> Result<ChatOutcome> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }
        let client = self.api.client();
        let endpoint = self.api.chat_endpoint();

        let sent = match endpoint {
            ChatEndpoint::Workflow => {
                let mut inputs = Map::new();
                inputs.insert("prompt".to_string(), json!(message));
                inputs.insert("context".to_string(), json!(request.context));
                inputs.extend(request.extra_inputs.clone());
                let body = WorkflowRunRequest::new(inputs, client.user());
                client.post(endpoint.path(), &body).await
            }
            ChatEndpoint::ChatMessages => {
                let mut inputs = Map::new();
                inputs.insert("context".to_string(), json!(request.context));
                inputs.extend(request.extra_inputs.clone());
                let body = ChatMessagesRequest {
                    inputs,
                    query: message.to_string(),
                    response_mode: RESPONSE_MODE,
                    conversation_id: request.conversation_id.unwrap_or_default().to_string(),
                    user: client.user().to_string(),
                };
                client.post(endpoint.path(), &body).await
            }
        };

        Ok(match sent {
            Ok(body) => ChatOutcome::Answered(parse_reply(&body, request.conversation_id)),
            Err(error) => {
                tracing::warn!(error = %error, "assistant message failed");
                let reply = ChatReply {
                    answer: diagnostic(&error),
                    conversation_id: conversation_or_new(request.conversation_id),
                    message_id: generated_id("msg"),
                    created_at: Utc::now(),
                };
                ChatOutcome::Failed { error, reply }
            }
        })
    }
}

/// Normalize either wire shape into a [`ChatReply`].
fn parse_reply(body: &Value, conversation_id: Option<&str>) -> ChatReply {
    let answer = first_str(
        body,
        &["/data/outputs/text", "/data/outputs/answer", "/answer"],
    )
    .unwrap_or(NO_ANSWER);
    let conversation_id = first_str(body, &["/conversation_id"])
        .map(ToString::to_string)
        .unwrap_or_else(|| conversation_or_new(conversation_id));
    let message_id = first_str(body, &["/message_id", "/workflow_run_id", "/id"])
        .map(ToString::to_string)
        .unwrap_or_else(|| generated_id("msg"));
    let created_at = body
        .get("created_at")
        .or_else(|| body.pointer("/data/created_at"))
        .and_then(timestamp_value)
        .unwrap_or_else(Utc::now);

    ChatReply {
        answer: answer.to_string(),
        conversation_id,
        message_id,
        created_at,
    }
}

/// The service reports `created_at` as unix seconds; accept strings too.
fn timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|s| Utc.timestamp_opt(s, 0).single()),
        Value::String(s) => parse_timestamp(s),
        _ => None,
    }
}

fn conversation_or_new(conversation_id: Option<&str>) -> String {
    conversation_id
        .filter(|id| !id.trim().is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| generated_id("conv"))
}

fn generated_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_millis())
}

/// User-facing explanation of a failed assistant call.
pub fn diagnostic(error: &ApiError) -> String {
    match error {
        ApiError::Transport(_) => format!(
            "Cannot connect to the workflow service. Check:\n\n\
             1. That your network connection works\n\
             2. That the base URL ({}) is correct\n\
             3. That no firewall blocks the connection",
            BASE_URL_ENV
        ),
        ApiError::Unauthorized => format!(
            "API key authentication failed (401). Check:\n\n\
             1. That {} is correct\n\
             2. That the key has not expired\n\
             3. That the key has access to this workflow",
            API_KEY_ENV
        ),
        ApiError::BadRequest(detail) => format!(
            "Bad request (400):\n\n{}\n\n\
             Possible causes:\n\
             1. The workflow does not exist or is not published\n\
             2. The input parameters are malformed\n\
             3. The workflow is misconfigured\n\n\
             Check the workflow settings in the service console.",
            detail
        ),
        ApiError::NotFound => "Workflow not found (404). Check:\n\n\
             1. That the workflow has been created\n\
             2. That the workflow is published\n\
             3. That the API key belongs to the right app"
            .to_string(),
        other => {
            let status = other
                .status()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "no status".to_string());
            let detail = match other {
                ApiError::Status { message, .. } => message.clone(),
                _ => other.to_string(),
            };
            format!(
                "Request failed ({}):\n\n{}\n\n\
                 Check the network connection and API configuration, or contact an administrator.",
                status, detail
            )
        }
    }
}
