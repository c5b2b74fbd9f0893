// src/types/acquisition.rs
//! Inputs and outputs of the content acquisition pipeline.

use super::{ApiKey, ValidationError, ValidatedUrl};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the caller wants turned into documentation text.
///
/// Both fields may be set; non-blank `text` always wins over `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionRequest {
    pub url: Option<String>,
    pub text: Option<String>,
}

/// The effective input after precedence rules have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionTarget {
    /// Caller-supplied text, already trimmed.
    Text(String),
    /// A page to fetch.
    Url(ValidatedUrl),
}

impl AcquisitionRequest {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            text: None,
        }
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            url: None,
            text: Some(text.into()),
        }
    }

    /// Resolves which input is effective.
    ///
    /// Non-blank text takes precedence; otherwise the URL must be present and
    /// parse as an absolute http(s) URL.
    pub fn target(&self) -> Result<AcquisitionTarget, ValidationError> {
        if let Some(text) = self.text.as_deref().map(str::trim) {
            if !text.is_empty() {
                return Ok(AcquisitionTarget::Text(text.to_string()));
            }
        }

        match self.url.as_deref().map(str::trim) {
            None | Some("") => Err(ValidationError::MissingSource),
            Some(url) => ValidatedUrl::parse(url).map(AcquisitionTarget::Url),
        }
    }
}

/// Which strategy produced an [`AcquisitionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentOrigin {
    Direct,
    ManagedExtractor,
    BasicFetch,
}

impl ContentOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::ManagedExtractor => "managed-extractor",
            Self::BasicFetch => "basic-fetch",
        }
    }
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded documentation text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionResult {
    pub content: String,
    pub source: ContentOrigin,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AcquisitionResult {
    pub fn new(content: String, source: ContentOrigin) -> Self {
        Self {
            content,
            source,
            title: None,
        }
    }

    /// Attaches a page title, ignoring blank ones.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }
}

/// Per-call credentials. Never stored by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub llm_key: Option<ApiKey>,
    pub extractor_key: Option<ApiKey>,
}

impl Credentials {
    pub fn new(llm_key: Option<ApiKey>, extractor_key: Option<ApiKey>) -> Self {
        Self {
            llm_key,
            extractor_key,
        }
    }

    /// Fills any missing key from `fallback`, keeping explicitly supplied ones.
    pub fn or(self, fallback: &Credentials) -> Credentials {
        Credentials {
            llm_key: self.llm_key.or_else(|| fallback.llm_key.clone()),
            extractor_key: self
                .extractor_key
                .or_else(|| fallback.extractor_key.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_takes_precedence_over_url() {
        let request = AcquisitionRequest {
            url: Some("https://example.com/docs".to_string()),
            text: Some("  Hello World  ".to_string()),
        };
        assert_eq!(
            request.target().unwrap(),
            AcquisitionTarget::Text("Hello World".to_string())
        );
    }

    #[test]
    fn blank_text_falls_back_to_url() {
        let request = AcquisitionRequest {
            url: Some("https://example.com/docs".to_string()),
            text: Some(" \n\t ".to_string()),
        };
        assert!(matches!(request.target().unwrap(), AcquisitionTarget::Url(_)));
    }

    #[test]
    fn missing_inputs_fail_validation() {
        assert_eq!(
            AcquisitionRequest::default().target().unwrap_err(),
            ValidationError::MissingSource
        );
        let blank = AcquisitionRequest {
            url: Some("  ".to_string()),
            text: Some("".to_string()),
        };
        assert_eq!(blank.target().unwrap_err(), ValidationError::MissingSource);
    }

    #[test]
    fn relative_url_fails_validation() {
        let err = AcquisitionRequest::from_url("docs/index.html")
            .target()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl { .. }));
    }

    #[test]
    fn origin_serializes_kebab_case() {
        let json = serde_json::to_string(&ContentOrigin::ManagedExtractor).unwrap();
        assert_eq!(json, "\"managed-extractor\"");
        assert_eq!(ContentOrigin::BasicFetch.to_string(), "basic-fetch");
    }

    #[test]
    fn explicit_credentials_win_over_fallback() {
        let explicit = Credentials::new(Some(ApiKey::new("sk-explicit").unwrap()), None);
        let fallback = Credentials::new(
            Some(ApiKey::new("sk-fallback").unwrap()),
            Some(ApiKey::new("fc-fallback").unwrap()),
        );
        let merged = explicit.or(&fallback);
        assert_eq!(merged.llm_key.unwrap().as_str(), "sk-explicit");
        assert_eq!(merged.extractor_key.unwrap().as_str(), "fc-fallback");
    }

    #[test]
    fn blank_title_is_dropped() {
        let result = AcquisitionResult::new("body".into(), ContentOrigin::ManagedExtractor)
            .with_title(Some("   ".into()));
        assert_eq!(result.title, None);
    }
}
