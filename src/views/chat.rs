//! Assistant conversation held in page memory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::{ChatOutcome, ChatRequest, DashboardApi};
use crate::models::{ChatMessage, Role, Suggestion};
use crate::{Error, Result};

/// Context sent by the chat page.
pub const CHAT_CONTEXT: &str = "project_management";

const WELCOME: &str = "Hello! I am your project management assistant. I can help you:\n\n\
    - Create and manage project tasks\n\
    - Check project progress and status\n\
    - Generate risk assessment reports\n\
    - Analyze team performance\n\
    - Offer project management advice\n\n\
    What do you need help with?";

const CLEARED: &str =
    "Conversation cleared. I am your project management assistant; what do you need help with?";

/// Canned questions offered on the welcome message and as follow-ups.
pub fn quick_questions() -> Vec<Suggestion> {
    vec![
        Suggestion::new(
            "Create a high-priority task for the user login feature",
            "Task management",
        ),
        Suggestion::new("Show all tasks currently in progress", "Task query"),
        Suggestion::new("Generate this week's project risk report", "Risk analysis"),
        Suggestion::new("Which project has the most effective team?", "Efficiency"),
        Suggestion::new("Which tasks are due soon and need attention?", "Progress tracking"),
        Suggestion::new("Help me analyze the main causes of project delays", "Problem analysis"),
    ]
}

/// Follow-up suggestions chosen by keywords in the user's message.
pub fn contextual_suggestions(input: &str) -> Vec<Suggestion> {
    let input = input.to_lowercase();
    let category = if input.contains("task") || input.contains("create") {
        Some("Task management")
    } else if input.contains("risk") || input.contains("report") {
        Some("Risk analysis")
    } else if input.contains("team") || input.contains("velocity") || input.contains("efficien") {
        Some("Efficiency")
    } else {
        None
    };

    let questions = quick_questions();
    match category {
        Some(category) => questions
            .into_iter()
            .filter(|q| q.category == category)
            .take(2)
            .collect(),
        None => questions.into_iter().take(2).collect(),
    }
}

/// A downloadable plain-text conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub filename: String,
    pub content: String,
}

/// One assistant conversation.
#[derive(Debug, Clone)]
pub struct ChatSession {
    context: String,
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
    next_id: u64,
    suggest: bool,
}

impl ChatSession {
    /// Conversation for the chat page: opens with a welcome message and
    /// offers follow-up suggestions.
    pub fn new() -> Self {
        let mut session = Self::empty(CHAT_CONTEXT, true);
        session.push_welcome(WELCOME);
        session
    }

    /// Conversation embedded in another page: no welcome, no suggestions.
    pub fn embedded(context: &str) -> Self {
        Self::empty(context, false)
    }

    fn empty(context: &str, suggest: bool) -> Self {
        Self {
            context: context.to_string(),
            messages: Vec::new(),
            conversation_id: None,
            next_id: 1,
            suggest,
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Send a message and append both sides of the exchange.
    pub async fn send(&mut self, api: &DashboardApi, text: &str) -> Result<&ChatMessage> {
        self.send_with(api, text, Map::new()).await
    }

    /// Like [`send`](Self::send), with extra workflow inputs.
    pub async fn send_with(
        &mut self,
        api: &DashboardApi,
        text: &str,
        extra_inputs: Map<String, Value>,
    ) -> Result<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }
        self.push_user(text);

        let conversation = self.conversation_id.clone();
        let mut request = ChatRequest::new(text)
            .context(&self.context)
            .conversation(conversation.as_deref());
        request.extra_inputs = extra_inputs;
        let outcome = api.chat().send(request).await?;
        Ok(self.record(text, outcome))
    }

    pub fn push_user(&mut self, text: &str) -> &ChatMessage {
        let message = self.message(Role::User, text.to_string());
        self.push(message)
    }

    /// Append the assistant side of an exchange.
    pub fn record(&mut self, user_text: &str, outcome: ChatOutcome) -> &ChatMessage {
        let answered = outcome.is_answered();
        let reply = outcome.into_reply();
        let mut message = self.message(Role::Ai, reply.answer);
        message.timestamp = reply.created_at;
        if answered {
            if !reply.conversation_id.is_empty() {
                self.conversation_id = Some(reply.conversation_id.clone());
            }
            message.conversation_id = Some(reply.conversation_id);
            if self.suggest {
                message.suggestions = contextual_suggestions(user_text);
            }
        } else {
            message.is_error = true;
        }
        self.push(message)
    }

    /// Drop the history and conversation, leaving a single welcome message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.conversation_id = None;
        if self.suggest {
            self.push_welcome(CLEARED);
        }
    }

    /// Render the conversation as plain text, one block per message.
    ///
    /// Blocks are separated by a blank line. Continuation lines of a message
    /// are indented by two spaces, so a block never contains a blank line.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| {
                format!(
                    "[{}] {}: {}",
                    m.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    m.role.label(),
                    m.content.lines().collect::<Vec<_>>().join("\n  ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn export(&self, now: DateTime<Utc>) -> Transcript {
        Transcript {
            filename: format!("assistant-transcript_{}.txt", now.format("%Y-%m-%d")),
            content: self.transcript(),
        }
    }

    fn push_welcome(&mut self, text: &str) {
        let mut message = self.message(Role::Ai, text.to_string());
        message.suggestions = quick_questions().into_iter().take(3).collect();
        self.push(message);
    }

    fn message(&mut self, role: Role, content: String) -> ChatMessage {
        let id = self.next_id;
        self.next_id += 1;
        ChatMessage {
            id,
            role,
            content,
            timestamp: Utc::now(),
            conversation_id: None,
            suggestions: Vec::new(),
            is_error: false,
        }
    }

    fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::config::FallbackPolicy;
    use crate::models::ChatReply;
    use crate::test_utils::{StubReply, StubServer, test_api};
    use chrono::TimeZone;
    use serde_json::json;

    fn reply(answer: &str, conversation: &str) -> ChatReply {
        ChatReply {
            answer: answer.into(),
            conversation_id: conversation.into(),
            message_id: "m".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_session_has_welcome_with_three_suggestions() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::Ai);
        assert_eq!(session.messages()[0].suggestions.len(), 3);
        assert!(ChatSession::embedded("task_management").messages().is_empty());
    }

    #[test]
    fn test_contextual_suggestions_by_keyword() {
        let s = contextual_suggestions("Please CREATE something");
        assert!(s.iter().all(|q| q.category == "Task management"));
        let s = contextual_suggestions("risk overview");
        assert_eq!(s[0].category, "Risk analysis");
        let s = contextual_suggestions("how is the team doing");
        assert_eq!(s[0].category, "Efficiency");
        let s = contextual_suggestions("hello");
        assert_eq!(s, quick_questions()[..2].to_vec());
    }

    #[test]
    fn test_record_tracks_conversation_and_flags_errors() {
        let mut session = ChatSession::new();
        session.push_user("any risks?");
        let msg = session.record("any risks?", ChatOutcome::Answered(reply("Two.", "conv-1")));
        assert!(!msg.is_error);
        assert_eq!(msg.suggestions[0].category, "Risk analysis");
        assert_eq!(session.conversation_id(), Some("conv-1"));

        let failed = ChatOutcome::Failed {
            error: ApiError::NotFound,
            reply: reply("Workflow not found (404).", "conv-x"),
        };
        let msg = session.record("again", failed);
        assert!(msg.is_error);
        assert!(msg.suggestions.is_empty());
        assert_eq!(session.conversation_id(), Some("conv-1"));
    }

    #[test]
    fn test_clear_resets_to_single_welcome() {
        let mut session = ChatSession::new();
        session.push_user("hi");
        session.record("hi", ChatOutcome::Answered(reply("hello", "conv-1")));
        session.clear();
        assert_eq!(session.messages().len(), 1);
        assert!(session.messages()[0].content.starts_with("Conversation cleared"));
        assert_eq!(session.conversation_id(), None);
    }

    #[test]
    fn test_export_has_one_block_per_message() {
        let mut session = ChatSession::new();
        session.push_user("first");
        session.record("first", ChatOutcome::Answered(reply("one", "c")));
        session.push_user("second");

        let now = Utc.with_ymd_and_hms(2024, 1, 17, 9, 0, 0).unwrap();
        let transcript = session.export(now);
        assert_eq!(transcript.filename, "assistant-transcript_2024-01-17.txt");

        let headers = transcript
            .content
            .lines()
            .filter(|l| l.starts_with('['))
            .filter(|l| l.contains("] User: ") || l.contains("] Assistant: "))
            .count();
        assert_eq!(headers, session.messages().len());
        assert!(transcript.content.contains("] User: second"));
    }

    #[test]
    fn test_export_blocks_split_on_blank_lines() {
        let mut session = ChatSession::new();
        session.push_user("hello");
        session.record(
            "hello",
            ChatOutcome::Failed {
                error: ApiError::Unauthorized,
                reply: reply("Check your key.\n\n1. first\n2. second", "c"),
            },
        );

        let content = session.transcript();
        let blocks: Vec<&str> = content.split("\n\n").collect();
        assert_eq!(blocks.len(), session.messages().len());
        assert!(blocks.iter().all(|b| b.starts_with('[')));
        assert!(blocks[2].contains("Check your key.\n  \n  1. first\n  2. second"));
    }

    #[tokio::test]
    async fn test_send_appends_both_sides() {
        let stub =
            StubServer::start(|_, _| StubReply::Outputs(json!({"answer": "On track."}))).await;
        let api = test_api(&stub.base_url, FallbackPolicy::Mock);
        let mut session = ChatSession::new();
        let msg = session.send(&api, "  status of the team?  ").await.unwrap();
        assert_eq!(msg.content, "On track.");
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].content, "status of the team?");
        assert_eq!(stub.last_request().body["inputs"]["context"], CHAT_CONTEXT);
    }

    #[tokio::test]
    async fn test_send_rejects_blank() {
        let api = test_api("http://127.0.0.1:9/v1", FallbackPolicy::Mock);
        let mut session = ChatSession::new();
        assert!(session.send(&api, "   ").await.is_err());
        assert_eq!(session.messages().len(), 1);
    }
}
