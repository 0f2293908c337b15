//! Completion service configuration.

use serde::{Deserialize, Serialize};

/// Hosted OpenAI-compatible endpoints, keyed by provider name.
const GROQ_ENDPOINT: &str = "https://api.groq.com/openai";
const OPENAI_ENDPOINT: &str = "https://api.openai.com";
const TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
const OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Page text cap applied before prompting.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 24_000;

/// Wire protocol spoken by the completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions (Groq, OpenAI, Together.ai)
    #[default]
    OpenAI,
    /// Ollama `/api/generate`
    Ollama,
}

impl LlmProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

/// Configuration for the completion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Protocol to use (openai or ollama)
    pub provider: LlmProvider,
    /// Base URL; the protocol path is appended
    pub endpoint: String,
    /// Bearer token for OpenAI-compatible providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Maximum tokens in the response
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Page text beyond this many characters is cut before prompting
    pub max_content_chars: usize,
    /// Per-call timeout
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            endpoint: GROQ_ENDPOINT.to_string(),
            api_key: None,
            model: "llama-3.1-8b-instant".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Supported variables:
    /// - `LLM_PROVIDER`: "groq" (default), "openai", "together", or "ollama"
    /// - `LLM_ENDPOINT`: base URL (defaults based on provider)
    /// - `LLM_API_KEY`: API key, otherwise `GROQ_API_KEY` / `OPENAI_API_KEY`
    /// - `LLM_MODEL`, `LLM_MAX_TOKENS`, `LLM_TEMPERATURE`, `LLM_MAX_CONTENT_CHARS`
    ///
    /// An explicit `LLM_PROVIDER` decides which vendor key is read; without
    /// it, `GROQ_API_KEY` is tried before `OPENAI_API_KEY`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_provider = lookup("LLM_PROVIDER").map(|p| p.to_lowercase());
        let explicit_endpoint = lookup("LLM_ENDPOINT");

        if let Some(provider) = explicit_provider.as_deref().and_then(LlmProvider::from_str) {
            self.provider = provider;
        }
        if let Some(endpoint) = &explicit_endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(key) = lookup("LLM_API_KEY") {
            self.api_key = Some(key);
        }

        match explicit_provider.as_deref() {
            Some(name) => {
                if explicit_endpoint.is_none() {
                    match name {
                        "groq" => self.endpoint = GROQ_ENDPOINT.to_string(),
                        "openai" => self.endpoint = OPENAI_ENDPOINT.to_string(),
                        "together" => self.endpoint = TOGETHER_ENDPOINT.to_string(),
                        "ollama" => self.endpoint = OLLAMA_ENDPOINT.to_string(),
                        _ => {}
                    }
                }
                if self.api_key.is_none() {
                    match name {
                        "groq" => self.api_key = lookup("GROQ_API_KEY"),
                        "openai" => self.api_key = lookup("OPENAI_API_KEY"),
                        _ => {}
                    }
                }
            }
            None if self.api_key.is_none() => {
                if let Some(key) = lookup("GROQ_API_KEY") {
                    self.api_key = Some(key);
                } else if let Some(key) = lookup("OPENAI_API_KEY") {
                    self.api_key = Some(key);
                    if explicit_endpoint.is_none() && self.endpoint == GROQ_ENDPOINT {
                        self.endpoint = OPENAI_ENDPOINT.to_string();
                    }
                }
            }
            None => {}
        }

        if let Some(val) = lookup("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = lookup("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = lookup("LLM_MAX_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.max_content_chars = n;
        }
        self
    }

    /// Replace the API key when the caller supplies one for this run.
    pub fn with_api_key(mut self, api_key: Option<&str>) -> Self {
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            self.api_key = Some(key.to_string());
        }
        self
    }

    /// Copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.api_key.is_some() {
            copy.api_key = Some("********".to_string());
        }
        copy
    }
}
