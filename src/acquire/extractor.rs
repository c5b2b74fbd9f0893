// src/acquire/extractor.rs
//! Managed extractor strategy (Firecrawl-compatible scrape API).
//!
//! The service renders the page server-side and returns markdown. Anything
//! short of a clearly successful, non-trivial extraction is reported as an
//! [`ExtractorFailure`] so the pipeline can fall through to a plain fetch.

use super::AcquisitionStrategy;
use crate::error::{AppError, ExtractorFailure};
use crate::types::{
    char_len, truncate_owned, AcquisitionResult, ApiKey, ContentOrigin, Credentials,
    ValidatedUrl,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'static str; 1],
}

/// Scrape response. Older and newer API versions put the markdown either at
/// the top level or under `data`, so both are accepted.
#[derive(Deserialize, Default)]
struct ScrapeResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<PageMetadata>,
    #[serde(default)]
    data: Option<ScrapeData>,
}

#[derive(Deserialize, Default)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    metadata: Option<PageMetadata>,
}

#[derive(Deserialize, Default)]
struct PageMetadata {
    #[serde(default)]
    title: Option<serde_json::Value>,
}

impl PageMetadata {
    fn title(&self) -> Option<String> {
        self.title.as_ref()?.as_str().map(str::to_string)
    }
}

impl ScrapeResponse {
    fn into_page(self) -> (String, Option<String>) {
        let title = self
            .metadata
            .as_ref()
            .and_then(PageMetadata::title)
            .or_else(|| self.data.as_ref()?.metadata.as_ref()?.title());

        let data = self.data.unwrap_or_default();
        let body = [self.markdown, data.markdown, self.content, data.content]
            .into_iter()
            .flatten()
            .find(|text| !text.is_empty())
            .unwrap_or_default();

        (body, title)
    }
}

/// Strategy backed by a managed content-extraction service.
pub struct ManagedExtractor {
    client: Client,
    endpoint: String,
    max_chars: usize,
    min_chars: usize,
}

impl ManagedExtractor {
    pub fn new(client: Client, base_url: &str, max_chars: usize, min_chars: usize) -> Self {
        Self {
            client,
            endpoint: format!("{}/v1/scrape", base_url.trim_end_matches('/')),
            max_chars,
            min_chars,
        }
    }

    async fn scrape(
        &self,
        url: &ValidatedUrl,
        key: &ApiKey,
    ) -> Result<AcquisitionResult, AppError> {
        log::debug!("POST {} for {}", self.endpoint, url);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key.as_str())
            .json(&ScrapeRequest {
                url: url.as_str(),
                formats: ["markdown"],
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::PAYMENT_REQUIRED {
            return Err(AppError::Extractor(ExtractorFailure::InsufficientCredits));
        }

        if !status.is_success() {
            let failure = match serde_json::from_str::<ScrapeResponse>(&body)
                .ok()
                .and_then(|r| r.error)
            {
                Some(message) => match ExtractorFailure::from_message(message) {
                    ExtractorFailure::Rejected { reason } => ExtractorFailure::Status {
                        status: status.as_u16(),
                        body: reason,
                    },
                    other => other,
                },
                None => ExtractorFailure::Status {
                    status: status.as_u16(),
                    body: truncate_owned(body, 200),
                },
            };
            return Err(AppError::Extractor(failure));
        }

        let parsed: ScrapeResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::Extractor(ExtractorFailure::Malformed {
                cause: e.to_string(),
            })
        })?;

        if parsed.success == Some(false) || parsed.error.is_some() {
            let message = parsed
                .error
                .unwrap_or_else(|| "Failed to scrape URL".to_string());
            return Err(AppError::Extractor(ExtractorFailure::from_message(message)));
        }

        let (content, title) = parsed.into_page();
        let chars = char_len(&content);
        if chars <= self.min_chars {
            return Err(AppError::Extractor(ExtractorFailure::ThinContent { chars }));
        }

        Ok(
            AcquisitionResult::new(
                truncate_owned(content, self.max_chars),
                ContentOrigin::ManagedExtractor,
            )
            .with_title(title),
        )
    }
}

#[async_trait::async_trait]
impl AcquisitionStrategy for ManagedExtractor {
    fn origin(&self) -> ContentOrigin {
        ContentOrigin::ManagedExtractor
    }

    fn is_available(&self, credentials: &Credentials) -> bool {
        credentials.extractor_key.is_some()
    }

    async fn attempt(
        &self,
        url: &ValidatedUrl,
        credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError> {
        let key = credentials.extractor_key.as_ref().ok_or_else(|| {
            AppError::MissingConfiguration("no extractor key configured".to_string())
        })?;
        self.scrape(url, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> (String, Option<String>) {
        serde_json::from_value::<ScrapeResponse>(json)
            .unwrap()
            .into_page()
    }

    #[test]
    fn reads_nested_data_shape() {
        let (body, title) = parse(serde_json::json!({
            "success": true,
            "data": { "markdown": "# Docs", "metadata": { "title": "Example API" } }
        }));
        assert_eq!(body, "# Docs");
        assert_eq!(title.as_deref(), Some("Example API"));
    }

    #[test]
    fn prefers_top_level_markdown() {
        let (body, _) = parse(serde_json::json!({
            "markdown": "top",
            "content": "fallback",
            "data": { "markdown": "nested" }
        }));
        assert_eq!(body, "top");
    }

    #[test]
    fn falls_back_to_content_field() {
        let (body, title) = parse(serde_json::json!({ "content": "plain" }));
        assert_eq!(body, "plain");
        assert_eq!(title, None);
    }

    #[test]
    fn non_string_title_is_ignored() {
        let (_, title) = parse(serde_json::json!({
            "markdown": "x",
            "metadata": { "title": ["a", "b"] }
        }));
        assert_eq!(title, None);
    }

    #[test]
    fn unavailable_without_key() {
        let extractor = ManagedExtractor::new(Client::new(), "http://localhost", 10, 1);
        assert!(!extractor.is_available(&Credentials::default()));
        let creds = Credentials::new(None, Some(ApiKey::new("fc-key").unwrap()));
        assert!(extractor.is_available(&creds));
    }
}
