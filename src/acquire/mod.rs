// src/acquire/mod.rs
//! Content acquisition: turning a URL or pasted text into one bounded document.
//!
//! Pasted text short-circuits everything. For a URL, the configured strategies
//! are tried in order and the first success wins; each strategy's failure is
//! logged and swallowed. Only exhausting every strategy reaches the caller.

mod basic_fetch;
mod extractor;

pub use basic_fetch::BasicFetch;
pub use extractor::ManagedExtractor;

use crate::config::PipelineConfig;
use crate::error::AppError;
use crate::types::{
    AcquisitionRequest, AcquisitionResult, AcquisitionTarget, ContentOrigin, Credentials,
    ValidatedUrl,
};

/// One way of turning a documentation URL into text.
#[async_trait::async_trait]
pub trait AcquisitionStrategy: Send + Sync {
    /// Which origin a success from this strategy reports.
    fn origin(&self) -> ContentOrigin;

    /// Whether the strategy can run with these credentials at all.
    fn is_available(&self, _credentials: &Credentials) -> bool {
        true
    }

    async fn attempt(
        &self,
        url: &ValidatedUrl,
        credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError>;
}

/// Ordered chain of acquisition strategies.
pub struct Acquirer {
    strategies: Vec<Box<dyn AcquisitionStrategy>>,
}

impl Acquirer {
    /// Managed extractor first, then basic fetch.
    pub fn new(config: &PipelineConfig, client: reqwest::Client) -> Self {
        Self::with_strategies(vec![
            Box::new(ManagedExtractor::new(
                client.clone(),
                &config.extractor_base_url,
                config.budgets.extractor_max_chars,
                config.budgets.extractor_min_chars,
            )),
            Box::new(BasicFetch::new(
                client,
                config.user_agents.clone(),
                config.budgets.reduced_max_chars,
                config.budgets.basic_fetch_min_chars,
            )),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn AcquisitionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Produces documentation text for `request`.
    ///
    /// Fails with a validation error when neither usable text nor a URL is
    /// present, and with the acquisition error once every strategy has failed.
    pub async fn acquire(
        &self,
        request: &AcquisitionRequest,
        credentials: &Credentials,
    ) -> Result<AcquisitionResult, AppError> {
        let url = match request.target()? {
            AcquisitionTarget::Text(text) => {
                log::info!("Using {} characters of pasted text", text.chars().count());
                return Ok(AcquisitionResult::new(text, ContentOrigin::Direct));
            }
            AcquisitionTarget::Url(url) => url,
        };

        log::info!("Acquiring documentation from {}", url);

        for strategy in &self.strategies {
            let origin = strategy.origin();
            if !strategy.is_available(credentials) {
                log::debug!("Skipping {} strategy: not configured", origin);
                continue;
            }

            match strategy.attempt(&url, credentials).await {
                Ok(result) => {
                    log::info!(
                        "Acquired {} characters via {}",
                        result.content.chars().count(),
                        origin
                    );
                    return Ok(result);
                }
                Err(e) => {
                    log::warn!("{} strategy failed for {}: {}", origin, url, e);
                }
            }
        }

        log::error!("All acquisition strategies failed for {}", url);
        Err(AppError::acquisition_exhausted())
    }
}
