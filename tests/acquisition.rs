// tests/acquisition.rs
//! Acquisition pipeline against local mock pages and a mock extractor.

mod common;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use common::{config_for, docs_page, serve};
use docs2guide::constants::FETCH_USER_AGENTS;
use docs2guide::{
    AcquisitionRequest, ApiKey, ContentOrigin, Credentials, DocsGuide, DocumentSource, ErrorKind,
    PipelineConfig,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn extractor_credentials() -> Credentials {
    Credentials::new(None, Some(ApiKey::new("fc-test-key").unwrap()))
}

/// Serves `/docs` with a fixed HTML body and counts the hits.
fn docs_route(html: String, hits: Arc<AtomicUsize>) -> Router {
    Router::new().route(
        "/docs",
        get(move || {
            let html = html.clone();
            let hits = hits.clone();
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Html(html)
            }
        }),
    )
}

/// Serves `/v1/scrape` with a fixed status and body, recording the
/// authorization header and request body.
fn scrape_route(status: StatusCode, reply: Value, seen: Arc<Mutex<Vec<Value>>>) -> Router {
    Router::new().route(
        "/v1/scrape",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let reply = reply.clone();
            let seen = seen.clone();
            async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                seen.lock()
                    .unwrap()
                    .push(json!({ "authorization": auth, "body": body }));
                (status, Json(reply))
            }
        }),
    )
}

async fn acquire_url(
    config: &PipelineConfig,
    url: String,
    credentials: &Credentials,
) -> Result<docs2guide::AcquisitionResult, docs2guide::AppError> {
    let guide = DocsGuide::new(config).unwrap();
    guide
        .acquire(&AcquisitionRequest::from_url(url), credentials)
        .await
}

#[tokio::test]
async fn pasted_text_is_trimmed_and_wins_over_url() {
    let guide = DocsGuide::new(&PipelineConfig::default()).unwrap();
    let request = AcquisitionRequest {
        url: Some("https://docs.example.com/api".to_string()),
        text: Some("  Hello World  ".to_string()),
    };

    let result = guide
        .acquire(&request, &Credentials::default())
        .await
        .unwrap();

    assert_eq!(result.content, "Hello World");
    assert_eq!(result.source, ContentOrigin::Direct);
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "content": "Hello World", "source": "direct" })
    );
}

#[tokio::test]
async fn missing_source_is_a_validation_error() {
    let guide = DocsGuide::new(&PipelineConfig::default()).unwrap();
    for request in [
        AcquisitionRequest::default(),
        AcquisitionRequest::from_text("   \n\t "),
        AcquisitionRequest {
            url: Some("  ".to_string()),
            text: Some(String::new()),
        },
    ] {
        let err = guide
            .acquire(&request, &Credentials::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{:?}", request);
        assert_eq!(err.to_string(), "URL or text content is required");
    }
}

#[tokio::test]
async fn unsupported_url_scheme_is_a_validation_error() {
    let guide = DocsGuide::new(&PipelineConfig::default()).unwrap();
    let err = guide
        .acquire(
            &AcquisitionRequest::from_url("ftp://docs.example.com/api"),
            &Credentials::default(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn basic_fetch_reduces_the_page_without_an_extractor_key() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(docs_route(docs_page(20), hits.clone())).await;

    let result = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &Credentials::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.source, ContentOrigin::BasicFetch);
    assert!(
        result.content.starts_with("## Title\n\nIntro text here."),
        "{:?}",
        result.content
    );
    assert!(result.content.chars().count() > 200);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_page_exhausts_every_user_agent_then_fails() {
    let hits = Arc::new(AtomicUsize::new(0));
    let html = "<html><body><p>Too short to be documentation.</p></body></html>".to_string();
    let base = serve(docs_route(html, hits.clone())).await;

    let err = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &Credentials::default(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Acquisition);
    assert!(err.to_string().contains("Paste Text"));
    assert_eq!(hits.load(Ordering::SeqCst), FETCH_USER_AGENTS.len());
}

#[tokio::test]
async fn blocked_browser_agents_fall_back_to_the_next_agent() {
    let agents = Arc::new(Mutex::new(Vec::<String>::new()));
    let seen = agents.clone();
    let app = Router::new().route(
        "/docs",
        get(move |headers: HeaderMap| {
            let seen = seen.clone();
            async move {
                let agent = headers
                    .get(header::USER_AGENT)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let allowed = agent.starts_with("curl/");
                seen.lock().unwrap().push(agent);
                if allowed {
                    Html(docs_page(20)).into_response()
                } else {
                    StatusCode::FORBIDDEN.into_response()
                }
            }
        }),
    );
    let base = serve(app).await;

    let result = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &Credentials::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.source, ContentOrigin::BasicFetch);
    let agents = agents.lock().unwrap().clone();
    let expected: Vec<String> = FETCH_USER_AGENTS.iter().map(|s| s.to_string()).collect();
    assert_eq!(agents, expected);
}

#[tokio::test]
async fn basic_fetch_output_respects_the_reduced_text_bound() {
    let hits = Arc::new(AtomicUsize::new(0));
    let base = serve(docs_route(docs_page(500), hits)).await;
    let mut config = config_for(&base);
    config.budgets.reduced_max_chars = 300;

    let result = acquire_url(&config, format!("{}/docs", base), &Credentials::default())
        .await
        .unwrap();

    assert_eq!(result.content.chars().count(), 300);
}

#[tokio::test]
async fn extractor_markdown_is_used_when_substantial() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let markdown = format!("# Example API\n\n{}", "Endpoint details. ".repeat(10));
    let reply = json!({
        "success": true,
        "data": { "markdown": markdown, "metadata": { "title": "Example API" } }
    });
    let base = serve(scrape_route(StatusCode::OK, reply, seen.clone())).await;
    let page = format!("{}/docs", base);

    let result = acquire_url(&config_for(&base), page.clone(), &extractor_credentials())
        .await
        .unwrap();

    assert_eq!(result.source, ContentOrigin::ManagedExtractor);
    assert_eq!(result.content, markdown);
    assert_eq!(result.title.as_deref(), Some("Example API"));

    let requests = seen.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["authorization"], "Bearer fc-test-key");
    assert_eq!(
        requests[0]["body"],
        json!({ "url": page, "formats": ["markdown"] })
    );
}

#[tokio::test]
async fn extraction_of_exactly_the_minimum_falls_through_to_basic_fetch() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hits = Arc::new(AtomicUsize::new(0));
    let reply = json!({ "success": true, "data": { "markdown": "x".repeat(100) } });
    let app = scrape_route(StatusCode::OK, reply, seen.clone())
        .merge(docs_route(docs_page(20), hits.clone()));
    let base = serve(app).await;

    let result = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &extractor_credentials(),
    )
    .await
    .unwrap();

    assert_eq!(result.source, ContentOrigin::BasicFetch);
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn extraction_one_past_the_minimum_is_accepted() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = json!({ "markdown": "x".repeat(101) });
    let base = serve(scrape_route(StatusCode::OK, reply, seen)).await;

    let result = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &extractor_credentials(),
    )
    .await
    .unwrap();

    assert_eq!(result.source, ContentOrigin::ManagedExtractor);
    assert_eq!(result.content.len(), 101);
}

#[tokio::test]
async fn extractor_without_credits_falls_through_to_basic_fetch() {
    for (status, reply) in [
        (
            StatusCode::PAYMENT_REQUIRED,
            json!({ "success": false, "error": "Payment required" }),
        ),
        (
            StatusCode::OK,
            json!({ "success": false, "error": "Insufficient credits to perform this request" }),
        ),
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" })),
    ] {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));
        let app = scrape_route(status, reply, seen)
            .merge(docs_route(docs_page(20), hits.clone()));
        let base = serve(app).await;

        let result = acquire_url(
            &config_for(&base),
            format!("{}/docs", base),
            &extractor_credentials(),
        )
        .await
        .unwrap();

        assert_eq!(result.source, ContentOrigin::BasicFetch, "status {}", status);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test]
async fn extractor_output_respects_its_bound() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = json!({ "success": true, "data": { "markdown": "é".repeat(2_000) } });
    let base = serve(scrape_route(StatusCode::OK, reply, seen)).await;
    let mut config = config_for(&base);
    config.budgets.extractor_max_chars = 500;

    let result = acquire_url(&config, format!("{}/docs", base), &extractor_credentials())
        .await
        .unwrap();

    assert_eq!(result.content.chars().count(), 500);
}

#[tokio::test]
async fn configured_extractor_key_is_used_when_the_request_has_none() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reply = json!({ "markdown": "y".repeat(150) });
    let base = serve(scrape_route(StatusCode::OK, reply, seen.clone())).await;
    let mut config = config_for(&base);
    config.fallback_credentials = extractor_credentials();

    let result = acquire_url(&config, format!("{}/docs", base), &Credentials::default())
        .await
        .unwrap();

    assert_eq!(result.source, ContentOrigin::ManagedExtractor);
    assert_eq!(seen.lock().unwrap()[0]["authorization"], "Bearer fc-test-key");
}

#[tokio::test]
async fn unreachable_host_reports_the_paste_text_fallback() {
    // Bind then drop a listener so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let base = format!("http://{}", addr);

    let err = acquire_url(
        &config_for(&base),
        format!("{}/docs", base),
        &extractor_credentials(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Acquisition);
}
