//! One-shot assistant command.

use serde::Serialize;

use super::{Output, to_json};
use crate::Result;
use crate::api::{ChatRequest, DashboardApi};
use crate::models::ChatReply;

#[derive(Serialize)]
pub struct ChatAnswer {
    pub answered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(flatten)]
    pub reply: ChatReply,
}

impl Output for ChatAnswer {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let mut out = self.reply.answer.clone();
        if self.answered && !self.reply.conversation_id.is_empty() {
            out.push_str(&format!("\n\n(conversation {})", self.reply.conversation_id));
        }
        out
    }

    fn succeeded(&self) -> bool {
        self.answered
    }
}

/// Send one message. A failed exchange still yields an answer: the
/// diagnostic for the failure.
pub async fn chat_ask(
    api: &DashboardApi,
    message: &str,
    context: &str,
    conversation: Option<&str>,
) -> Result<ChatAnswer> {
    let request = ChatRequest::new(message)
        .context(context)
        .conversation(conversation);
    let outcome = api.chat().send(request).await?;
    Ok(ChatAnswer {
        answered: outcome.is_answered(),
        error: outcome.error().map(|e| e.kind()),
        reply: outcome.into_reply(),
    })
}
