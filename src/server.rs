// src/server.rs
//! JSON HTTP front end over the pipeline.
//!
//! | Method | Path | Body |
//! |--------|------|------|
//! | `POST` | `/api/crawl` | `{url?, text?, extractorKey?}` |
//! | `POST` | `/api/analyze` | `{content, userIntent?, apiName?, llmKey?}` |
//! | `POST` | `/api/chat` | `{message, content, history?, apiName?, llmKey?}` |
//! | `GET`  | `/health` | |
//!
//! Validation and acquisition failures answer 400, credential failures 401,
//! everything else 500. Error bodies are `{error, message?}`.

use crate::config::PipelineConfig;
use crate::error::{AppError, ErrorKind};
use crate::guide::{QuestionRequest, SummaryRequest};
use crate::model::SummaryDocument;
use crate::pipeline::{DocsAssistant, DocsGuide, DocumentSource, GuideAuthor};
use crate::types::{AcquisitionRequest, AcquisitionResult, ApiKey, ConversationTurn, Credentials};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

type SharedGuide = Arc<DocsGuide>;

/// Binds `bind_addr` and serves until the process exits.
pub async fn run_server(config: &PipelineConfig, bind_addr: &str) -> Result<(), AppError> {
    let guide = Arc::new(DocsGuide::new(config)?);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    println!("docs2guide listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(guide)).await?;
    Ok(())
}

/// Routes with permissive CORS, for embedding in tests or another server.
pub fn router(guide: SharedGuide) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/crawl", post(handle_crawl))
        .route("/api/analyze", post(handle_analyze))
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(guide)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Maps a pipeline error onto a status code.
    ///
    /// Client-facing failures carry their own message as `error`; upstream and
    /// internal failures use `fallback` and put the detail in `message`.
    fn from_app(err: AppError, fallback: &str) -> Self {
        let (status, body) = match err.kind() {
            ErrorKind::Validation | ErrorKind::Acquisition => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: err.to_string(),
                    message: None,
                },
            ),
            ErrorKind::Auth => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error: err.to_string(),
                    message: None,
                },
            ),
            ErrorKind::Upstream | ErrorKind::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: fallback.to_string(),
                    message: Some(err.to_string()),
                },
            ),
        };
        Self { status, body }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Unwraps a JSON body, answering 400 `{error, message}` when it is not JSON
/// or does not fit the expected shape.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>, fallback: &str) -> Result<T, ApiError> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            log::warn!("Rejected request body: {}", rejection.body_text());
            Err(ApiError {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody {
                    error: fallback.to_string(),
                    message: Some(rejection.body_text()),
                },
            })
        }
    }
}

/// Reads an explicit `null` as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses an optional key from a request body; blank counts as absent.
fn request_key(raw: Option<&str>, fallback: &str) -> Result<Option<ApiKey>, ApiError> {
    ApiKey::from_optional(raw).map_err(|e| ApiError::from_app(e.into(), fallback))
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============ POST /api/crawl ============

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CrawlBody {
    url: Option<String>,
    text: Option<String>,
    #[serde(alias = "firecrawlKey")]
    extractor_key: Option<String>,
}

async fn handle_crawl(
    State(guide): State<SharedGuide>,
    body: Result<Json<CrawlBody>, JsonRejection>,
) -> Result<Json<AcquisitionResult>, ApiError> {
    const FAILED: &str = "Failed to process request";
    let body = parse_body(body, FAILED)?;
    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] crawl url={:?} text_chars={}",
        request_id,
        body.url,
        body.text.as_deref().map_or(0, |t| t.chars().count())
    );

    let credentials = Credentials::new(None, request_key(body.extractor_key.as_deref(), FAILED)?);
    let request = AcquisitionRequest {
        url: body.url,
        text: body.text,
    };

    let result = guide
        .acquire(&request, &credentials)
        .await
        .inspect_err(|e| log::warn!("[{}] crawl failed: {}", request_id, e))
        .map_err(|e| ApiError::from_app(e, FAILED))?;

    log::info!(
        "[{}] crawl ok via {} ({} chars)",
        request_id,
        result.source,
        result.content.chars().count()
    );
    Ok(Json(result))
}

// ============ POST /api/analyze ============

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AnalyzeBody {
    #[serde(alias = "docsContent", deserialize_with = "null_as_default")]
    content: String,
    #[serde(alias = "userContext")]
    user_intent: Option<String>,
    api_name: Option<String>,
    #[serde(alias = "openaiKey")]
    llm_key: Option<String>,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    analysis: SummaryDocument,
}

async fn handle_analyze(
    State(guide): State<SharedGuide>,
    body: Result<Json<AnalyzeBody>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    const FAILED: &str = "Failed to analyze documentation";
    let body = parse_body(body, FAILED)?;
    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] analyze {} chars, api_name={:?}",
        request_id,
        body.content.chars().count(),
        body.api_name
    );

    let key = request_key(body.llm_key.as_deref(), FAILED)?;
    let request = SummaryRequest {
        content: body.content,
        user_intent: body.user_intent,
        api_name: body.api_name,
    };

    let analysis = guide
        .summarize(&request, key.as_ref())
        .await
        .inspect_err(|e| log::warn!("[{}] analyze failed: {}", request_id, e))
        .map_err(|e| ApiError::from_app(e, FAILED))?;

    Ok(Json(AnalyzeResponse { analysis }))
}

// ============ POST /api/chat ============

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChatBody {
    #[serde(deserialize_with = "null_as_default")]
    message: String,
    #[serde(alias = "docsContent", deserialize_with = "null_as_default")]
    content: String,
    #[serde(alias = "conversationHistory", deserialize_with = "null_as_default")]
    history: Vec<ConversationTurn>,
    api_name: Option<String>,
    #[serde(alias = "openaiKey")]
    llm_key: Option<String>,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

async fn handle_chat(
    State(guide): State<SharedGuide>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    const FAILED: &str = "Failed to process chat message";
    let body = parse_body(body, FAILED)?;
    let request_id = Uuid::new_v4();
    log::info!(
        "[{}] chat with {} prior turns",
        request_id,
        body.history.len()
    );

    let key = request_key(body.llm_key.as_deref(), FAILED)?;
    let request = QuestionRequest {
        message: body.message,
        content: body.content,
        history: body.history,
        api_name: body.api_name,
    };

    let response = guide
        .ask(&request, key.as_ref())
        .await
        .inspect_err(|e| log::warn!("[{}] chat failed: {}", request_id, e))
        .map_err(|e| ApiError::from_app(e, FAILED))?;

    Ok(Json(ChatResponse { response }))
}
