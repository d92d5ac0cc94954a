//! Core domain types and models
//!
//! Defines Config, FileMap, the chat Conversation, and the built-in defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Model used when neither the config file nor the CLI names one.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Completion token ceiling sent with every request.
pub const DEFAULT_MAX_TOKENS: u32 = 1500;

/// Seconds to wait between attempts when the service fails transiently.
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 30;

/// Environment variable holding the service credential.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Base URL of the OpenAI-compatible chat-completions API.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Relative path -> file content (or a read-error placeholder).
///
/// A `BTreeMap` keeps entries sorted by path, which fixes the order files
/// appear in the assembled prompt.
pub type FileMap = BTreeMap<String, String>;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// The role that answers this one in an alternating exchange.
    pub fn counterpart(self) -> Role {
        match self {
            Role::Assistant => Role::User,
            Role::User | Role::System => Role::Assistant,
        }
    }
}

/// A single role-tagged chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Ordered messages submitted to the completion service.
///
/// Built once through [`Conversation::new`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// System instruction, primary user message, then `extra_turns`
    /// alternating assistant/user starting with assistant.
    pub fn new<S: AsRef<str>>(system: &str, user: &str, extra_turns: &[S]) -> Self {
        let mut messages = Vec::with_capacity(2 + extra_turns.len());
        messages.push(Message::new(Role::System, system));
        messages.push(Message::new(Role::User, user));

        let mut role = Role::Assistant;
        for turn in extra_turns {
            messages.push(Message::new(role, turn.as_ref()));
            role = role.counterpart();
        }

        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Retry settings as they appear in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_retry_delay_secs")]
    pub delay_secs: u64,

    /// Growth factor applied to the delay after each retry (1.0 = fixed)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Upper bound on any single delay, in seconds
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,

    /// Randomize each delay between half and the full computed value
    #[serde(default)]
    pub jitter: bool,

    /// Give up once this many seconds have elapsed since the first attempt
    #[serde(default)]
    pub max_elapsed_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_secs: default_retry_delay_secs(),
            multiplier: default_multiplier(),
            max_delay_secs: default_max_delay_secs(),
            jitter: false,
            max_elapsed_secs: None,
        }
    }
}

/// Complete tool configuration, resolved once at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory to collect files from
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Model identifier sent to the completion service
    #[serde(default = "default_model")]
    pub model: String,

    /// Completion token ceiling
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Base URL of the chat-completions API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-request HTTP timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// File-name suffixes skipped during collection (case-sensitive)
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,

    /// Glob patterns matched against relative paths; matches are skipped
    #[serde(default)]
    pub exclude_globs: Vec<String>,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum directory depth below the root (unbounded when unset)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Retry policy for transient service failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
            excluded_extensions: default_excluded_extensions(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
            max_depth: None,
            retry: RetryConfig::default(),
        }
    }
}

// Default value functions for serde
fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_max_attempts() -> u32 {
    10
}

fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY_SECS
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_max_delay_secs() -> u64 {
    300
}

/// Image formats that are never sent to the model.
pub fn default_excluded_extensions() -> Vec<String> {
    [".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".ico", ".tif", ".tiff"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
