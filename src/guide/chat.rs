// src/guide/chat.rs
//! Conversational Q&A over a single piece of documentation.

use super::prompts::{Prompts, CHAT_SYSTEM};
use super::{non_blank, resolve_key, QuestionRequest};
use crate::constants::{CHAT_MAX_TOKENS, CHAT_TEMPERATURE};
use crate::error::AppError;
use crate::llm::{ChatMessage, CompletionRequest, CompletionService};
use crate::types::{recent_turns, truncate_chars, ApiKey, ValidationError};
use serde_json::json;
use std::sync::Arc;

pub struct Assistant {
    llm: Arc<dyn CompletionService>,
    prompts: Arc<Prompts>,
    max_content_chars: usize,
    history_limit: Option<usize>,
    fallback_key: Option<ApiKey>,
}

impl Assistant {
    pub fn new(
        llm: Arc<dyn CompletionService>,
        prompts: Arc<Prompts>,
        max_content_chars: usize,
        history_limit: Option<usize>,
        fallback_key: Option<ApiKey>,
    ) -> Self {
        Self {
            llm,
            prompts,
            max_content_chars,
            history_limit,
            fallback_key,
        }
    }

    /// System turn, then prior turns in their original order, then the new
    /// question.
    pub fn build_messages(&self, request: &QuestionRequest) -> Result<Vec<ChatMessage>, AppError> {
        let system = self.prompts.render(
            CHAT_SYSTEM,
            &json!({
                "api_name": non_blank(request.api_name.as_deref()).unwrap_or("provided"),
                "documentation": truncate_chars(&request.content, self.max_content_chars),
            }),
        )?;

        let history = recent_turns(&request.history, self.history_limit);
        if history.len() < request.history.len() {
            log::debug!(
                "Replaying {} of {} history turns",
                history.len(),
                request.history.len()
            );
        }

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system));
        messages.extend(history.iter().map(ChatMessage::from));
        messages.push(ChatMessage::user(request.message.clone()));
        Ok(messages)
    }

    /// Answers one question; the reply is markdown prose.
    pub async fn ask(
        &self,
        request: &QuestionRequest,
        llm_key: Option<&ApiKey>,
    ) -> Result<String, AppError> {
        if request.message.trim().is_empty() {
            return Err(ValidationError::EmptyField("Message").into());
        }
        if request.content.trim().is_empty() {
            return Err(ValidationError::EmptyField("Documentation content").into());
        }
        let key = resolve_key(llm_key, self.fallback_key.as_ref())?;

        let completion = CompletionRequest {
            messages: self.build_messages(request)?,
            temperature: CHAT_TEMPERATURE,
            max_tokens: Some(CHAT_MAX_TOKENS),
            json_mode: false,
        };

        log::info!(
            "Asking question with {} prior turns",
            completion.messages.len() - 2
        );

        let answer = self.llm.complete(&completion, key).await?;
        if answer.trim().is_empty() {
            return Err(AppError::EmptyCompletion);
        }
        Ok(answer)
    }
}
