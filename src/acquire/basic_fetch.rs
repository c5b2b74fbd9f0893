// src/acquire/basic_fetch.rs
//! Plain HTTP fetch followed by HTML reduction.
//!
//! Some documentation hosts reject unfamiliar clients, so the page is
//! requested once per User-Agent, strictly in order, until one attempt yields
//! enough readable text.

use super::AcquisitionStrategy;
use crate::constants::{FETCH_ACCEPT, FETCH_ACCEPT_LANGUAGE};
use crate::error::AppError;
use crate::html::reduce_with_limit;
use crate::types::{char_len, AcquisitionResult, ContentOrigin, Credentials, ValidatedUrl};
use reqwest::{header, Client};

/// Why a single User-Agent attempt did not produce usable text.
#[derive(Debug)]
enum AttemptFailure {
    Transport(reqwest::Error),
    Status(reqwest::StatusCode),
    TooShort(usize),
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "request failed: {}", e),
            Self::Status(status) => write!(f, "HTTP {}", status),
            Self::TooShort(chars) => write!(f, "only {} characters of text", chars),
        }
    }
}

pub struct BasicFetch {
    client: Client,
    user_agents: Vec<String>,
    max_chars: usize,
    min_chars: usize,
}

impl BasicFetch {
    pub fn new(client: Client, user_agents: Vec<String>, max_chars: usize, min_chars: usize) -> Self {
        Self {
            client,
            user_agents,
            max_chars,
            min_chars,
        }
    }

    async fn fetch_as(&self, url: &ValidatedUrl, user_agent: &str) -> Result<String, AttemptFailure> {
        let response = self
            .client
            .get(url.as_str())
            .header(header::USER_AGENT, user_agent)
            .header(header::ACCEPT, FETCH_ACCEPT)
            .header(header::ACCEPT_LANGUAGE, FETCH_ACCEPT_LANGUAGE)
            .send()
            .await
            .map_err(AttemptFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptFailure::Status(status));
        }

        let html = response.text().await.map_err(AttemptFailure::Transport)?;
        let text = reduce_with_limit(&html, self.max_chars);
        let chars = char_len(&text);
        if chars <= self.min_chars {
            return Err(AttemptFailure::TooShort(chars));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl AcquisitionStrategy for BasicFetch {
    fn origin(&self) -> ContentOrigin {
        ContentOrigin::BasicFetch
    }

    async fn attempt(
        &self,
        url: &ValidatedUrl,
        _credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError> {
        let mut failures = Vec::with_capacity(self.user_agents.len());

        for user_agent in &self.user_agents {
            log::debug!("GET {} as {}", url, user_agent);
            match self.fetch_as(url, user_agent).await {
                Ok(text) => return Ok(AcquisitionResult::new(text, ContentOrigin::BasicFetch)),
                Err(failure) => {
                    log::debug!("Fetch as {} failed: {}", user_agent, failure);
                    failures.push(failure.to_string());
                }
            }
        }

        Err(AppError::StrategyFailed {
            strategy: ContentOrigin::BasicFetch,
            reason: if failures.is_empty() {
                "no user agents configured".to_string()
            } else {
                failures.join("; ")
            },
        })
    }
}
