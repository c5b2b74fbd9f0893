// src/config.rs
use crate::constants::*;
use crate::error::AppError;
use crate::keystore::StoredKeys;
use crate::types::{ApiKey, Credentials};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Parsed and validated command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Completion service API key (falls back to the local key store)
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    pub llm_key: Option<String>,

    /// Managed extractor API key (falls back to the local key store)
    #[arg(long, env = "FIRECRAWL_API_KEY", global = true, hide_env_values = true)]
    pub extractor_key: Option<String>,

    /// Base URL of an OpenAI-compatible completion service
    #[arg(long, env = "DOCS2GUIDE_LLM_BASE_URL", global = true, default_value = DEFAULT_LLM_BASE_URL)]
    pub llm_base_url: String,

    /// Model requested from the completion service
    #[arg(long, env = "DOCS2GUIDE_MODEL", global = true, default_value = DEFAULT_LLM_MODEL)]
    pub model: String,

    /// Base URL of the managed extractor service
    #[arg(long, env = "DOCS2GUIDE_EXTRACTOR_BASE_URL", global = true, default_value = DEFAULT_EXTRACTOR_BASE_URL)]
    pub extractor_base_url: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Conversation turns replayed to the model (0 = no limit)
    #[arg(long, global = true, default_value_t = CHAT_HISTORY_MAX_TURNS)]
    pub history_limit: usize,

    /// Documentation characters sent with a summarization request
    #[arg(long, global = true, default_value_t = SUMMARY_PROMPT_MAX_CHARS)]
    pub summary_chars: usize,

    /// Documentation characters sent with a chat request
    #[arg(long, global = true, default_value_t = CHAT_PROMPT_MAX_CHARS)]
    pub chat_chars: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch documentation text from a URL (or normalize pasted text)
    Acquire {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch documentation and summarize it into a practical guide
    #[command(alias = "summarize")]
    Analyze {
        #[command(flatten)]
        source: SourceArgs,
        /// What you are trying to build, used to prioritize the guide
        #[arg(short, long)]
        intent: Option<String>,
        /// Display name of the API (defaults to the URL's hostname)
        #[arg(long)]
        api_name: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Ask questions about a piece of documentation
    Ask {
        #[command(flatten)]
        source: SourceArgs,
        /// Question to ask; omit to start an interactive session
        #[arg(short, long)]
        message: Option<String>,
        /// JSON file holding prior turns: [{"role": "user", "content": "..."}]
        #[arg(long)]
        history: Option<PathBuf>,
        /// Display name of the API
        #[arg(long)]
        api_name: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Manage the locally stored API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Serve the crawl/analyze/chat JSON endpoints over HTTP
    Serve {
        /// Address to bind
        #[arg(long, default_value = DEFAULT_BIND_ADDR)]
        bind: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum KeysAction {
    /// Save one or both keys
    Set {
        #[arg(long)]
        llm_key: Option<String>,
        #[arg(long)]
        extractor_key: Option<String>,
    },
    /// Show which keys are stored (values are redacted)
    Show,
    /// Remove all stored keys
    Clear,
}

/// Where the documentation comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Documentation page URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Documentation text pasted directly
    #[arg(short, long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Read documentation text from a file ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Where results go.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the result to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Copy the result to the clipboard
    #[arg(short = 'b', long, default_value_t = false)]
    pub clipboard: bool,

    /// Result format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

/// Character bounds applied at each stage.
///
/// These are prompt-budget decisions tied to a model's context window, so they
/// are carried as configuration rather than baked into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budgets {
    pub extractor_max_chars: usize,
    pub reduced_max_chars: usize,
    pub extractor_min_chars: usize,
    pub basic_fetch_min_chars: usize,
    pub summary_prompt_chars: usize,
    pub chat_prompt_chars: usize,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            extractor_max_chars: EXTRACTOR_CONTENT_MAX_CHARS,
            reduced_max_chars: REDUCED_TEXT_MAX_CHARS,
            extractor_min_chars: EXTRACTOR_MIN_CONTENT_CHARS,
            basic_fetch_min_chars: BASIC_FETCH_MIN_CONTENT_CHARS,
            summary_prompt_chars: SUMMARY_PROMPT_MAX_CHARS,
            chat_prompt_chars: CHAT_PROMPT_MAX_CHARS,
        }
    }
}

/// Resolved pipeline configuration, shared read-only by every request.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub budgets: Budgets,
    pub llm_base_url: String,
    pub model: String,
    pub extractor_base_url: String,
    pub request_timeout: Duration,
    pub history_limit: Option<usize>,
    pub user_agents: Vec<String>,
    /// Keys used when a request does not carry its own.
    pub fallback_credentials: Credentials,
}

impl PipelineConfig {
    /// Resolves configuration from CLI input, environment, and stored keys.
    ///
    /// Key precedence: command-line flag, then environment, then key store.
    pub fn resolve(cli: &CommandLineInput, stored: &StoredKeys) -> Result<Self, AppError> {
        let llm_key = ApiKey::from_optional(cli.llm_key.as_deref())?
            .or(ApiKey::from_optional(stored.openai_api_key.as_deref())?);
        let extractor_key = ApiKey::from_optional(cli.extractor_key.as_deref())?
            .or(ApiKey::from_optional(stored.firecrawl_api_key.as_deref())?);

        if cli.timeout == 0 {
            return Err(AppError::MissingConfiguration(
                "--timeout must be at least 1 second".to_string(),
            ));
        }

        Ok(PipelineConfig {
            budgets: Budgets {
                summary_prompt_chars: cli.summary_chars,
                chat_prompt_chars: cli.chat_chars,
                ..Budgets::default()
            },
            llm_base_url: cli.llm_base_url.trim_end_matches('/').to_string(),
            model: cli.model.clone(),
            extractor_base_url: cli.extractor_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(cli.timeout),
            history_limit: (cli.history_limit > 0).then_some(cli.history_limit),
            user_agents: FETCH_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            fallback_credentials: Credentials::new(llm_key, extractor_key),
        })
    }

    /// Builds the shared HTTP client with the configured timeout.
    pub fn http_client(&self) -> Result<reqwest::Client, AppError> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            budgets: Budgets::default(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            extractor_base_url: DEFAULT_EXTRACTOR_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            history_limit: Some(CHAT_HISTORY_MAX_TURNS),
            user_agents: FETCH_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
            fallback_credentials: Credentials::default(),
        }
    }
}
