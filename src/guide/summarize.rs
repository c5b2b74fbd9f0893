// src/guide/summarize.rs
//! Documentation summarizer: one JSON-mode completion, parsed into a guide.

use super::prompts::{Prompts, SUMMARY_SYSTEM, SUMMARY_USER};
use super::{non_blank, resolve_key, SummaryRequest};
use crate::constants::SUMMARY_TEMPERATURE;
use crate::error::AppError;
use crate::llm::{ChatMessage, CompletionRequest, CompletionService};
use crate::model::SummaryDocument;
use crate::types::{truncate_chars, ApiKey, ValidationError};
use serde_json::json;
use std::sync::Arc;

pub struct Summarizer {
    llm: Arc<dyn CompletionService>,
    prompts: Arc<Prompts>,
    max_content_chars: usize,
    fallback_key: Option<ApiKey>,
}

impl Summarizer {
    pub fn new(
        llm: Arc<dyn CompletionService>,
        prompts: Arc<Prompts>,
        max_content_chars: usize,
        fallback_key: Option<ApiKey>,
    ) -> Self {
        Self {
            llm,
            prompts,
            max_content_chars,
            fallback_key,
        }
    }

    /// Builds the system and user messages for `request`.
    ///
    /// The user intent appears twice: inline with the instruction and again
    /// after the documentation, so the model weighs it after reading the docs.
    pub fn build_messages(&self, request: &SummaryRequest) -> Result<Vec<ChatMessage>, AppError> {
        let system = self.prompts.render(SUMMARY_SYSTEM, &json!({}))?;
        let user = self.prompts.render(
            SUMMARY_USER,
            &json!({
                "documentation": truncate_chars(&request.content, self.max_content_chars),
                "user_intent": non_blank(request.user_intent.as_deref()),
                "api_name": non_blank(request.api_name.as_deref()),
            }),
        )?;
        Ok(vec![ChatMessage::system(system), ChatMessage::user(user)])
    }

    /// Summarizes documentation into a [`SummaryDocument`].
    ///
    /// Missing content is reported before a missing key. Exactly one completion
    /// request is made; an empty or non-JSON answer is an upstream error.
    pub async fn summarize(
        &self,
        request: &SummaryRequest,
        llm_key: Option<&ApiKey>,
    ) -> Result<SummaryDocument, AppError> {
        if request.content.trim().is_empty() {
            return Err(ValidationError::EmptyField("Documentation content").into());
        }
        let key = resolve_key(llm_key, self.fallback_key.as_ref())?;

        let completion = CompletionRequest {
            messages: self.build_messages(request)?,
            temperature: SUMMARY_TEMPERATURE,
            max_tokens: None,
            json_mode: true,
        };

        log::info!(
            "Summarizing {} characters of documentation",
            request.content.chars().count().min(self.max_content_chars)
        );

        let text = self.llm.complete(&completion, key).await?;
        if text.trim().is_empty() {
            return Err(AppError::EmptyCompletion);
        }

        let document: SummaryDocument = serde_json::from_str(&text).map_err(|e| {
            AppError::MalformedResponse(format!("summary is not valid JSON: {}", e))
        })?;

        log::info!(
            "Guide for '{}': {} use cases, {} endpoints",
            document.api_name,
            document.common_use_cases.len(),
            document.key_endpoints.len()
        );

        Ok(document)
    }
}
