// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use std::fmt;
use url::Url;

/// Credential for the completion service or the managed extractor.
///
/// The raw value is only reachable through [`ApiKey::as_str`]; `Debug` and
/// `Display` both redact it so a key can never leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into().trim().to_string();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        // Keys travel in an Authorization header.
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot contain whitespace or control characters".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Treats an absent or blank value as "no key supplied".
    ///
    /// Browser forms and JSON clients send `""` for an unset key, which must
    /// fall back to the configured key rather than fail validation.
    pub fn from_optional(key: Option<&str>) -> Result<Option<Self>, ValidationError> {
        match key.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::new(value).map(Some),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "{}...", prefix)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self)
    }
}

/// Absolute http(s) URL of a documentation page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl(Url);

impl ValidatedUrl {
    pub fn parse(url: &str) -> Result<Self, ValidationError> {
        let trimmed = url.trim();
        match Url::parse(trimmed) {
            Ok(parsed_url) => {
                if parsed_url.scheme() != "http" && parsed_url.scheme() != "https" {
                    return Err(ValidationError::InvalidUrl {
                        url: trimmed.to_string(),
                        reason: "Only HTTP and HTTPS URLs are supported".to_string(),
                    });
                }
                if parsed_url.host_str().is_none() {
                    return Err(ValidationError::InvalidUrl {
                        url: trimmed.to_string(),
                        reason: "URL has no host".to_string(),
                    });
                }
                Ok(Self(parsed_url))
            }
            Err(e) => Err(ValidationError::InvalidUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Hostname used as the default API name for a guide built from this page.
    pub fn host_label(&self) -> &str {
        self.0.host_str().unwrap_or("API Documentation")
    }
}

impl fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
