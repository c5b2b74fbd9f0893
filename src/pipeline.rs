// src/pipeline.rs
//! Pipeline capability traits for the three operations a front end can drive.
//!
//! Each trait describes a single capability so the CLI and the JSON service
//! depend on what they need, and each stage can be tested in isolation.
//! [`DocsGuide`] wires the concrete implementations together.

use crate::acquire::Acquirer;
use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::guide::{Assistant, Prompts, QuestionRequest, Summarizer, SummaryRequest};
use crate::llm::{CompletionService, OpenAiClient};
use crate::model::SummaryDocument;
use crate::types::{AcquisitionRequest, AcquisitionResult, ApiKey, Credentials};
use std::sync::Arc;

/// Produces documentation text from a URL or pasted text.
#[async_trait::async_trait]
pub trait DocumentSource {
    async fn acquire(
        &self,
        request: &AcquisitionRequest,
        credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError>;
}

/// Turns documentation text into a structured guide.
#[async_trait::async_trait]
pub trait GuideAuthor {
    async fn summarize(
        &self,
        request: &SummaryRequest,
        llm_key: Option<&ApiKey>,
    ) -> Result<SummaryDocument, AppError>;
}

/// Answers questions about documentation text.
#[async_trait::async_trait]
pub trait DocsAssistant {
    async fn ask(&self, request: &QuestionRequest, llm_key: Option<&ApiKey>)
        -> Result<String, AppError>;
}

/// All three capabilities behind one immutable, shareable value.
pub struct DocsGuide {
    acquirer: Acquirer,
    summarizer: Summarizer,
    assistant: Assistant,
    fallback: Credentials,
}

impl DocsGuide {
    /// Builds the production wiring from configuration.
    pub fn new(config: &PipelineConfig) -> Result<Self, AppError> {
        let client = config.http_client()?;
        let llm: Arc<dyn CompletionService> = Arc::new(OpenAiClient::new(
            client.clone(),
            &config.llm_base_url,
            config.model.clone(),
        ));
        Ok(Self::with_parts(
            Acquirer::new(config, client),
            llm,
            Arc::new(Prompts::new()?),
            config,
        ))
    }

    /// Builds a guide around a supplied acquirer and completion service.
    pub fn with_parts(
        acquirer: Acquirer,
        llm: Arc<dyn CompletionService>,
        prompts: Arc<Prompts>,
        config: &PipelineConfig,
    ) -> Self {
        let fallback_llm_key = config.fallback_credentials.llm_key.clone();
        Self {
            acquirer,
            summarizer: Summarizer::new(
                llm.clone(),
                prompts.clone(),
                config.budgets.summary_prompt_chars,
                fallback_llm_key.clone(),
            ),
            assistant: Assistant::new(
                llm,
                prompts,
                config.budgets.chat_prompt_chars,
                config.history_limit,
                fallback_llm_key,
            ),
            fallback: config.fallback_credentials.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DocumentSource for DocsGuide {
    async fn acquire(
        &self,
        request: &AcquisitionRequest,
        credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError> {
        let credentials = credentials.clone().or(&self.fallback);
        self.acquirer.acquire(request, &credentials).await
    }
}

#[async_trait::async_trait]
impl GuideAuthor for DocsGuide {
    async fn summarize(
        &self,
        request: &SummaryRequest,
        llm_key: Option<&ApiKey>,
    ) -> Result<SummaryDocument, AppError> {
        self.summarizer.summarize(request, llm_key).await
    }
}

#[async_trait::async_trait]
impl DocsAssistant for DocsGuide {
    async fn ask(
        &self,
        request: &QuestionRequest,
        llm_key: Option<&ApiKey>,
    ) -> Result<String, AppError> {
        self.assistant.ask(request, llm_key).await
    }
}
