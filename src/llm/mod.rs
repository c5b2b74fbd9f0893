// src/llm/mod.rs
//! Completion service interaction: turning a message list into text.
//!
//! The summarizer and the Q&A service depend on [`CompletionService`], never on
//! HTTP details, so both can be exercised against a scripted implementation.

mod client;

pub use client::OpenAiClient;

use crate::error::AppError;
use crate::types::{ApiKey, ConversationTurn, Role};
use serde::Serialize;

/// Speaker of a message sent to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: match turn.role {
                Role::User => ChatRole::User,
                Role::Assistant => ChatRole::Assistant,
            },
            content: turn.content.clone(),
        }
    }
}

/// One completion request, independent of the model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Constrain the output to a JSON object.
    pub json_mode: bool,
}

/// The ability to complete a conversation.
///
/// Returns the first choice's text, which may be empty; callers decide whether
/// an empty completion is acceptable. A rejected key must surface as
/// [`AppError::InvalidCredential`].
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest, key: &ApiKey) -> Result<String, AppError>;
}
