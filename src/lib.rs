// src/lib.rs
//! docs2guide library: turns API documentation into a structured quick-start
//! guide and answers questions about it.
//!
//! # Public API
//!
//! - **Acquisition**: `Acquirer` with the `ManagedExtractor` and `BasicFetch`
//!   strategies, fed by an `AcquisitionRequest`
//! - **Reduction**: `html::reduce` for turning raw HTML into readable text
//! - **Model services**: `Summarizer`, `Assistant`, and the `CompletionService` seam
//! - **Facade**: `DocsGuide`, implementing the pipeline capability traits
//! - **Front ends**: `server::router` for the JSON service, `output` for CLI delivery

pub mod acquire;
pub mod config;
pub mod constants;
pub mod error;
pub mod guide;
pub mod html;
pub mod keystore;
pub mod llm;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod server;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, CompletionErrorCode, ErrorKind, ExtractorFailure};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Budgets, PipelineConfig};
pub use crate::keystore::{KeyStore, StoredKeys};

// --- Domain Types ---
pub use crate::types::{
    AcquisitionRequest, AcquisitionResult, ApiKey, ContentOrigin, ConversationTurn, Credentials,
    Role, ValidatedUrl,
};

// --- Acquisition ---
pub use crate::acquire::{AcquisitionStrategy, Acquirer, BasicFetch, ManagedExtractor};

// --- Model Services ---
pub use crate::guide::{Assistant, Prompts, QuestionRequest, Summarizer, SummaryRequest};
pub use crate::llm::{ChatMessage, ChatRole, CompletionRequest, CompletionService, OpenAiClient};
pub use crate::model::SummaryDocument;

// --- Pipeline Traits ---
pub use crate::pipeline::{DocsAssistant, DocsGuide, DocumentSource, GuideAuthor};
