// src/llm/client.rs
//! HTTP client for OpenAI-compatible chat completion APIs.

use super::{ChatMessage, CompletionRequest, CompletionService};
use crate::error::{AppError, CompletionErrorCode};
use crate::types::{truncate_owned, ApiKey};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(client: Client, base_url: &str, model: impl Into<String>) -> Self {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let model = model.into();
        log::debug!("Completion client configured: endpoint={}, model={}", endpoint, model);
        Self {
            client,
            endpoint,
            model,
        }
    }
}

/// Maps a non-success response onto the error taxonomy.
fn classify_failure(status: reqwest::StatusCode, body: String) -> AppError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(&body).ok();
    let code = parsed
        .as_ref()
        .and_then(|e| e.error.code.as_ref())
        .and_then(|c| c.as_str())
        .map(CompletionErrorCode::from_api_response)
        .unwrap_or_else(|| CompletionErrorCode::from_http_status(status.as_u16()));

    if code.is_auth_failure() || status == reqwest::StatusCode::UNAUTHORIZED {
        return AppError::invalid_llm_key();
    }

    let message = parsed
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| truncate_owned(body, 300));

    AppError::CompletionService {
        code,
        message,
        status,
    }
}

#[async_trait::async_trait]
impl CompletionService for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest, key: &ApiKey) -> Result<String, AppError> {
        let body = ChatRequest {
            model: &self.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        log::debug!(
            "POST {} ({} messages, json_mode={})",
            self.endpoint,
            request.messages.len(),
            request.json_mode
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        log::debug!("Completion response: status {}, {} bytes", status, text.len());

        if !status.is_success() {
            return Err(classify_failure(status, text));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}
