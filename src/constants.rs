// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! The character bounds below are prompt-budget decisions for a model with a
//! roughly 128k-token context window. They are defaults only: every one of
//! them is carried into [`crate::config::Budgets`] so a different backend can
//! retune them without touching the pipeline.

// ---------------------------------------------------------------------------
// Acquisition boundaries
// ---------------------------------------------------------------------------

/// Upper bound on content returned by the managed extractor.
pub const EXTRACTOR_CONTENT_MAX_CHARS: usize = 150_000;

/// Upper bound on text produced by the HTML reducer.
pub const REDUCED_TEXT_MAX_CHARS: usize = 100_000;

/// Extracted markdown must be strictly longer than this to count as a page.
///
/// Anti-bot interstitials and paywalls tend to come back as a sentence or two.
pub const EXTRACTOR_MIN_CONTENT_CHARS: usize = 100;

/// Reduced HTML must be strictly longer than this to count as documentation.
pub const BASIC_FETCH_MIN_CONTENT_CHARS: usize = 200;

/// User-Agent values tried, in order, by the basic fetch strategy.
pub const FETCH_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "curl/8.0.0",
];

pub const FETCH_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const FETCH_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

// ---------------------------------------------------------------------------
// Prompt budgets
// ---------------------------------------------------------------------------

/// Documentation characters included in the summarization prompt.
pub const SUMMARY_PROMPT_MAX_CHARS: usize = 80_000;

/// Documentation characters embedded in the chat system prompt.
pub const CHAT_PROMPT_MAX_CHARS: usize = 60_000;

/// Most recent conversation turns replayed to the completion service.
pub const CHAT_HISTORY_MAX_TURNS: usize = 40;

// ---------------------------------------------------------------------------
// Completion sampling
// ---------------------------------------------------------------------------

pub const SUMMARY_TEMPERATURE: f32 = 0.3;
pub const CHAT_TEMPERATURE: f32 = 0.5;
pub const CHAT_MAX_TOKENS: u32 = 2000;

// ---------------------------------------------------------------------------
// Collaborator defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";
pub const DEFAULT_EXTRACTOR_BASE_URL: &str = "https://api.firecrawl.dev";

/// Per-request HTTP timeout for every outbound call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Fixed key names used by the local key store.
pub const LLM_KEY_NAME: &str = "openai_api_key";
pub const EXTRACTOR_KEY_NAME: &str = "firecrawl_api_key";
pub const KEY_STORE_DIR: &str = "docs2guide";
pub const KEY_STORE_FILE: &str = "keys.json";
