use thiserror::Error;

mod acquisition;
mod bounded;
mod conversation;
mod domain_types;

pub use acquisition::*;
pub use bounded::*;
pub use conversation::*;
pub use domain_types::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL or text content is required")]
    MissingSource,

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} is required")]
    EmptyField(&'static str),

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },
}
