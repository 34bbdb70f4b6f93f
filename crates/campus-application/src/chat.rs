//! Chat panel: an append-only transcript backed by the assistant endpoint.

use crate::busy::BusyFlag;
use campus_core::api::PortalApi;
use campus_core::chat::{ChatMessage, ChatRequest, SenderRole};
use campus_core::{PortalError, Result};
use std::sync::Arc;

const DEFAULT_CONTEXT: &str = "general";
const DEFAULT_LANGUAGE: &str = "english";

pub struct ChatPanel {
    api: Arc<dyn PortalApi>,
    messages: Vec<ChatMessage>,
    chat_id: Option<String>,
    context_type: String,
    context_name: String,
    language: String,
    request_id: Option<String>,
    sending: BusyFlag,
    error: Option<String>,
}

impl ChatPanel {
    pub fn new(api: Arc<dyn PortalApi>) -> Self {
        Self {
            api,
            messages: Vec::new(),
            chat_id: None,
            context_type: DEFAULT_CONTEXT.to_string(),
            context_name: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_id: None,
            sending: BusyFlag::default(),
            error: None,
        }
    }

    /// Scopes the conversation, e.g. to one request type.
    pub fn with_context(mut self, context_type: impl Into<String>, context_name: impl Into<String>) -> Self {
        self.context_type = context_type.into();
        self.context_name = context_name.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn for_request(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn chat_id(&self) -> Option<&str> {
        self.chat_id.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending.is_set()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sends `text` and appends the assistant's reply.
    ///
    /// The user's message stays in the transcript even when the call fails.
    pub async fn send(&mut self, text: &str) -> Result<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PortalError::validation("message", "Please enter a message"));
        }
        let busy = self.sending.enter()?;

        self.messages.push(ChatMessage::new(SenderRole::User, text));
        let request = ChatRequest {
            message: text.to_string(),
            context_type: self.context_type.clone(),
            context_name: self.context_name.clone(),
            chat_id: self.chat_id.clone(),
            language: self.language.clone(),
            request_id: self.request_id.clone(),
        };

        self.error = None;
        let result = self.api.send_chat(&request).await;
        drop(busy);

        match result {
            Ok(reply) => {
                if let Some(chat_id) = reply.chat_id.filter(|id| !id.is_empty()) {
                    self.chat_id = Some(chat_id);
                }
                tracing::debug!(
                    "[Chat] Reply with {} source(s) in {:?}",
                    reply.sources.len(),
                    self.chat_id
                );
                self.messages
                    .push(ChatMessage::new(SenderRole::Assistant, reply.response));
                Ok(&self.messages[self.messages.len() - 1])
            }
            Err(e) => {
                tracing::warn!("[Chat] Send failed: {}", e);
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }
}
