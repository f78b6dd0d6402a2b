use std::time::Duration;

use async_trait::async_trait;
use mindful_core::Mood;
use thiserror::Error;

use crate::prompts::WORDS_PER_MINUTE;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors that can occur while generating a script
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Script generation is not configured (missing API key)")]
    NotConfigured,

    #[error("Script generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Script generation request failed: {message}")]
    Request {
        status: Option<u16>,
        message: String,
        retryable: bool,
    },

    #[error("Script generation returned no content")]
    EmptyResponse,

    #[error("Invalid response from script generator: {0}")]
    InvalidResponse(String),
}

impl GenerationError {
    /// Whether trying again may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout(_) => true,
            GenerationError::Request { retryable, .. } => *retryable,
            GenerationError::NotConfigured
            | GenerationError::EmptyResponse
            | GenerationError::InvalidResponse(_) => false,
        }
    }
}

/// What to generate a script for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRequest {
    pub mood: Mood,
    pub duration_minutes: u32,
}

impl ScriptRequest {
    pub fn new(mood: Mood, duration_minutes: u32) -> Self {
        Self {
            mood,
            duration_minutes,
        }
    }

    /// Rough script length for the requested duration.
    pub fn target_word_count(&self) -> u64 {
        u64::from(self.duration_minutes) * u64::from(WORDS_PER_MINUTE)
    }
}

/// Configuration for the text-generation service
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// `None` disables remote generation entirely
    pub api_key: Option<String>,
    /// OpenAI-compatible API root, without `/chat/completions`
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Extra attempts after a retryable failure
    pub max_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_tokens: 1000,
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }
}

impl GeneratorConfig {
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Full chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// A service that writes guided meditation scripts
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Human-readable name (e.g., "openai:gpt-4o-mini")
    fn name(&self) -> &str;

    /// Generate a script for the request
    async fn generate(&self, request: &ScriptRequest) -> Result<String, GenerationError>;
}

/// Generator used when no API key is configured. Always fails with `NotConfigured`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl ScriptGenerator for UnconfiguredGenerator {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn generate(&self, _request: &ScriptRequest) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}
