// tests/common/mod.rs
//! Local mock upstreams for integration tests.
#![allow(dead_code)]

use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use docs2guide::{Credentials, PipelineConfig};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("axum serve");
    });
    format!("http://{}", addr)
}

/// Configuration pointing every upstream at `base_url`, with no stored keys.
pub fn config_for(base_url: &str) -> PipelineConfig {
    PipelineConfig {
        llm_base_url: base_url.to_string(),
        extractor_base_url: base_url.to_string(),
        fallback_credentials: Credentials::default(),
        ..PipelineConfig::default()
    }
}

/// A documentation page whose reduced text starts with
/// `## Title\n\nIntro text here.` and grows with `padding`.
pub fn docs_page(padding: usize) -> String {
    format!(
        "<html><body><h1>Title</h1><p>Intro text here.{}</p></body></html>",
        " More detail.".repeat(padding)
    )
}

/// OpenAI-style success body with a single choice.
pub fn completion_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

pub fn sample_guide_json() -> String {
    json!({
        "apiName": "Petstore",
        "description": "Manage pets in a store.",
        "gettingStarted": { "steps": [{ "title": "Get a key", "description": "Sign up for an account." }] },
        "authentication": { "method": "API Key", "description": "Send the api_key header." },
        "commonUseCases": [{
            "title": "List pets",
            "description": "Page through pets.",
            "endpoints": ["GET /pets"],
            "codeExample": "curl https://petstore.example/pets",
            "tips": ["Use limit"]
        }],
        "keyEndpoints": [{ "method": "GET", "path": "/pets", "description": "List pets", "parameters": ["limit"] }]
    })
    .to_string()
}

/// A completion endpoint that records every request it receives.
pub struct MockCompletions {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockCompletions {
    /// Answers every `POST /chat/completions` with `status` and `reply`.
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let app = Router::new().route(
            "/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let seen = seen.clone();
                let reply = reply.clone();
                async move {
                    let authorization = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    seen.lock()
                        .unwrap()
                        .push(json!({ "authorization": authorization, "body": body }));
                    (status, Json(reply))
                }
            }),
        );
        Self {
            base_url: serve(app).await,
            requests,
        }
    }

    pub async fn replying(content: &str) -> Self {
        Self::start(StatusCode::OK, completion_reply(content)).await
    }

    /// Recorded requests as `{authorization, body}` objects.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}
