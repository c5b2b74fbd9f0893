// src/error.rs
//! Application error types with structured error handling.
//!
//! Every failure is classified into an [`ErrorKind`] so the CLI and the JSON
//! service can react to the category (validation, credentials, acquisition,
//! upstream) without matching on individual variants.

use crate::types::{ContentOrigin, ValidationError};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Completion-service error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionErrorCode {
    /// The key was rejected
    InvalidApiKey,
    /// The account has no remaining quota
    InsufficientQuota,
    /// Too many requests
    RateLimited,
    /// The configured model does not exist or is not available to the key
    ModelNotFound,
    /// The prompt exceeded the model's context window
    ContextLengthExceeded,
    /// HTTP status code fallback when the error body carries no code
    HttpStatus(u16),
    /// A code this client doesn't recognize yet
    Unknown(String),
}

impl CompletionErrorCode {
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "invalid_api_key" => Self::InvalidApiKey,
            "insufficient_quota" => Self::InsufficientQuota,
            "rate_limit_exceeded" => Self::RateLimited,
            "model_not_found" => Self::ModelNotFound,
            "context_length_exceeded" => Self::ContextLengthExceeded,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether the service rejected the credential itself.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::InvalidApiKey | Self::HttpStatus(401))
    }
}

impl fmt::Display for CompletionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidApiKey => write!(f, "invalid_api_key"),
            Self::InsufficientQuota => write!(f, "insufficient_quota"),
            Self::RateLimited => write!(f, "rate_limit_exceeded"),
            Self::ModelNotFound => write!(f, "model_not_found"),
            Self::ContextLengthExceeded => write!(f, "context_length_exceeded"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Why the managed extractor did not produce usable content.
///
/// This is not surfaced to callers; the pipeline logs it and moves on to the
/// next strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorFailure {
    /// The account ran out of credits (HTTP 402 or a credits error message).
    InsufficientCredits,
    /// The service answered `success: false` or with an error field.
    Rejected { reason: String },
    /// Any other non-success HTTP status.
    Status { status: u16, body: String },
    /// The extracted text was too short to be real documentation.
    ThinContent { chars: usize },
    /// The response body was not the expected JSON.
    Malformed { cause: String },
}

impl ExtractorFailure {
    /// Classifies an extractor error message, catching credit exhaustion that
    /// is reported in the body rather than the status code.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.to_ascii_lowercase().contains("credits") {
            Self::InsufficientCredits
        } else {
            Self::Rejected { reason: message }
        }
    }
}

impl fmt::Display for ExtractorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCredits => write!(f, "insufficient extractor credits"),
            Self::Rejected { reason } => write!(f, "extractor rejected the page: {}", reason),
            Self::Status { status, body } => write!(f, "extractor returned HTTP {}: {}", status, body),
            Self::ThinContent { chars } => {
                write!(f, "extracted content too short ({} characters)", chars)
            }
            Self::Malformed { cause } => write!(f, "malformed extractor response: {}", cause),
        }
    }
}

/// Caller-facing failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed input; not worth retrying unchanged.
    Validation,
    /// Missing or rejected credential.
    Auth,
    /// Every acquisition strategy was exhausted.
    Acquisition,
    /// A collaborator failed or returned unusable output.
    Upstream,
    /// Local failures: filesystem, templates, configuration.
    Internal,
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    MissingCredential(String),

    #[error("{0}")]
    InvalidCredential(String),

    #[error("{0}")]
    AcquisitionFailed(String),

    #[error("{strategy} strategy failed: {reason}")]
    StrategyFailed {
        strategy: ContentOrigin,
        reason: String,
    },

    #[error("Extractor failed: {0}")]
    Extractor(ExtractorFailure),

    #[error("Completion service returned an error ({code}): {message}")]
    CompletionService {
        code: CompletionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("No response from AI")]
    EmptyCompletion,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error interacting with clipboard: {0}")]
    Clipboard(String),

    #[error("Template render error for template {name}: {message}")]
    TemplateRenderError { name: String, message: String },

    #[error("JSON parse error for {path}: {source}")]
    JsonParseError {
        path: std::path::PathBuf,
        source: serde_json::Error,
    },

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    pub fn missing_llm_key() -> Self {
        AppError::MissingCredential(
            "OpenAI API key is required. Please add your API key in settings.".to_string(),
        )
    }

    pub fn invalid_llm_key() -> Self {
        AppError::InvalidCredential(
            "Invalid OpenAI API key. Please check your key in settings.".to_string(),
        )
    }

    /// The single terminal failure of the acquisition pipeline.
    pub fn acquisition_exhausted() -> Self {
        AppError::AcquisitionFailed(
            "Unable to fetch documentation from this URL. Please use \"Paste Text\" mode instead - copy the documentation content from the website and paste it directly."
                .to_string(),
        )
    }

    /// Message for a terminal user. Acquisition exhaustion points at the CLI
    /// flags instead of the web form's paste mode.
    pub fn cli_message(&self) -> String {
        match self.kind() {
            ErrorKind::Acquisition => concat!(
                "Unable to fetch documentation from this URL. Copy the documentation ",
                "content from the website and pass it with --text, or save it and use ",
                "--file (\"-\" reads stdin)."
            )
            .to_string(),
            _ => self.to_string(),
        }
    }

    /// Classifies this error for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::MissingCredential(_) | Self::InvalidCredential(_) => ErrorKind::Auth,
            Self::CompletionService { code, .. } if code.is_auth_failure() => ErrorKind::Auth,
            Self::AcquisitionFailed(_) => ErrorKind::Acquisition,
            Self::StrategyFailed { .. }
            | Self::Extractor(_)
            | Self::CompletionService { .. }
            | Self::EmptyCompletion
            | Self::MalformedResponse(_)
            | Self::NetworkFailure(_) => ErrorKind::Upstream,
            Self::MissingConfiguration(_)
            | Self::Io(_)
            | Self::Clipboard(_)
            | Self::TemplateRenderError { .. }
            | Self::JsonParseError { .. }
            | Self::DeliveryFailed { .. }
            | Self::InternalError { .. } => ErrorKind::Internal,
        }
    }
}

// Allow converting from anyhow::Error at the binary boundary
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<arboard::Error> for AppError {
    fn from(err: arboard::Error) -> Self {
        AppError::Clipboard(format!("Clipboard error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_codes_parse() {
        assert_eq!(
            CompletionErrorCode::from_api_response("invalid_api_key"),
            CompletionErrorCode::InvalidApiKey
        );
        assert_eq!(
            CompletionErrorCode::from_api_response("something_new"),
            CompletionErrorCode::Unknown("something_new".to_string())
        );
        assert!(CompletionErrorCode::from_http_status(401).is_auth_failure());
        assert!(!CompletionErrorCode::from_http_status(500).is_auth_failure());
    }

    #[test]
    fn credit_messages_classify_as_insufficient_credits() {
        assert_eq!(
            ExtractorFailure::from_message("Insufficient credits to perform this request"),
            ExtractorFailure::InsufficientCredits
        );
        assert!(matches!(
            ExtractorFailure::from_message("blocked by robots.txt"),
            ExtractorFailure::Rejected { .. }
        ));
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            AppError::from(ValidationError::MissingSource).kind(),
            ErrorKind::Validation
        );
        assert_eq!(AppError::missing_llm_key().kind(), ErrorKind::Auth);
        assert_eq!(AppError::invalid_llm_key().kind(), ErrorKind::Auth);
        assert_eq!(AppError::acquisition_exhausted().kind(), ErrorKind::Acquisition);
        assert_eq!(AppError::EmptyCompletion.kind(), ErrorKind::Upstream);
        assert_eq!(
            AppError::CompletionService {
                code: CompletionErrorCode::InvalidApiKey,
                message: "bad key".into(),
                status: reqwest::StatusCode::UNAUTHORIZED,
            }
            .kind(),
            ErrorKind::Auth
        );
    }

    #[test]
    fn acquisition_message_tells_user_what_to_do() {
        assert!(AppError::acquisition_exhausted()
            .to_string()
            .contains("Paste Text"));
    }

    #[test]
    fn cli_wording_names_the_input_flags() {
        let message = AppError::acquisition_exhausted().cli_message();
        assert!(message.contains("--text"));
        assert!(message.contains("--file"));
        assert!(!message.contains("Paste Text"));
        assert_eq!(
            AppError::missing_llm_key().cli_message(),
            AppError::missing_llm_key().to_string()
        );
    }
}
