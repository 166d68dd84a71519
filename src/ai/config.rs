//! AI Configuration - Provider and model settings
//!
//! Read from the `[ai]` section of the config file. API keys are only
//! ever taken from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// AI provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// Google Gemini models
    #[default]
    Gemini,
    /// OpenAI GPT models
    OpenAI,
    /// Local Ollama models
    Ollama,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::OpenAI => "openai",
            AiProvider::Ollama => "ollama",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini-2.5-flash",
            AiProvider::OpenAI => "gpt-4o",
            AiProvider::Ollama => "llama3.2",
        }
    }

    /// Environment variables consulted for the API key, in order
    pub fn env_key_names(&self) -> &'static [&'static str] {
        match self {
            AiProvider::Gemini => &["GEMINI_API_KEY", "API_KEY"],
            AiProvider::OpenAI => &["OPENAI_API_KEY"],
            AiProvider::Ollama => &[],
        }
    }

    pub fn requires_api_key(&self) -> bool {
        !self.env_key_names().is_empty()
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AiProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "openai" | "gpt" => Ok(AiProvider::OpenAI),
            "ollama" | "local" => Ok(AiProvider::Ollama),
            _ => Err(()),
        }
    }
}

/// AI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Active provider
    pub provider: AiProvider,
    /// Model identifier; the provider default when unset
    pub model: Option<String>,
    /// API key (environment only)
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Endpoint override (required for nothing, useful for proxies and Ollama)
    pub base_url: Option<String>,
    /// Maximum tokens for a response
    pub max_tokens: u32,
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Requests per minute
    pub rate_limit_rpm: u32,
    /// Tokens per minute
    pub rate_limit_tpm: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: 2048,
            temperature: 0.4,
            timeout_secs: 60,
            rate_limit_rpm: 30,
            rate_limit_tpm: 100_000,
        }
    }
}

impl AiConfig {
    pub fn with_provider(mut self, provider: AiProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Configured model, or the provider's default
    pub fn model_name(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fill the API key (and Ollama URL) from the environment when unset
    pub fn load_api_key_from_env(&mut self) {
        if self.api_key.is_none() {
            self.api_key = self
                .provider
                .env_key_names()
                .iter()
                .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()));
        }

        if self.provider == AiProvider::Ollama && self.base_url.is_none() {
            self.base_url = std::env::var("OLLAMA_BASE_URL").ok();
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some() || !self.provider.requires_api_key()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ));
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
