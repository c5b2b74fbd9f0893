// src/guide/mod.rs
//! Model-backed services over acquired documentation: the guide summarizer and
//! the conversational Q&A assistant.

mod chat;
pub mod prompts;
mod summarize;

pub use chat::Assistant;
pub use prompts::Prompts;
pub use summarize::Summarizer;

use crate::error::AppError;
use crate::types::{ApiKey, ConversationTurn};

/// Input to the summarizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryRequest {
    pub content: String,
    pub user_intent: Option<String>,
    pub api_name: Option<String>,
}

/// Input to one chat turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionRequest {
    pub message: String,
    pub content: String,
    pub history: Vec<ConversationTurn>,
    pub api_name: Option<String>,
}

/// Picks the per-call key, else the configured one.
pub(crate) fn resolve_key<'a>(
    explicit: Option<&'a ApiKey>,
    fallback: Option<&'a ApiKey>,
) -> Result<&'a ApiKey, AppError> {
    explicit.or(fallback).ok_or_else(AppError::missing_llm_key)
}

/// Trims optional free text, treating blank as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
