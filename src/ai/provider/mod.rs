//! AI Provider - Provider trait and implementations
//!
//! Providers are stateless text generators: every call carries the full
//! system instruction and message history. Conversation state is kept by
//! the gateway.

pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::config::{AiConfig, AiProvider as AiProviderKind};

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Author of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// One generation call: optional system instruction plus ordered messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
}

impl GenerationRequest {
    /// A single-turn request
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system: None,
            messages: vec![ChatMessage::user(text)],
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_messages(mut self, messages: Vec<ChatMessage>) -> Self {
        self.messages = messages;
        self
    }

    /// Rough token estimate (4 chars per token) plus room for the reply
    pub fn estimated_tokens(&self) -> u32 {
        let chars = self.system.as_ref().map_or(0, |s| s.len())
            + self.messages.iter().map(|m| m.text.len()).sum::<usize>();
        (chars / 4) as u32 + 1_000
    }
}

/// Text produced by a provider
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    pub tokens_used: u32,
    pub response_time_ms: u64,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_tokens(mut self, tokens: u32) -> Self {
        self.tokens_used = tokens;
        self
    }

    pub fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = ms;
        self
    }
}

/// A text-generation backend
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider name
    fn name(&self) -> &'static str;

    /// Model being used
    fn model(&self) -> &str;

    /// Generate a reply for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation>;

    /// Check if provider is reachable and configured
    async fn health_check(&self) -> Result<bool>;
}

/// Error types for AI providers
#[derive(Debug, thiserror::Error)]
pub enum AiProviderError {
    #[error("API key not configured for {provider} (set {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded { message: String },

    #[error("API error from {provider}: {message}")]
    ApiError { provider: String, message: String },

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },
}

/// Create a provider based on configuration
pub fn create_provider(config: &AiConfig) -> Result<Box<dyn AiProvider>> {
    let require_key = || {
        config.api_key.clone().ok_or_else(|| AiProviderError::MissingApiKey {
            provider: config.provider.to_string(),
            env_var: config.provider.env_key_names().join(" or "),
        })
    };

    let provider: Box<dyn AiProvider> = match config.provider {
        AiProviderKind::Gemini => Box::new(GeminiProvider::new(require_key()?, config)?),
        AiProviderKind::OpenAI => Box::new(OpenAiProvider::new(require_key()?, config)?),
        AiProviderKind::Ollama => Box::new(OllamaProvider::new(config)?),
    };

    Ok(provider)
}

/// Map a non-success HTTP status to a provider error
pub(crate) async fn status_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return AiProviderError::RateLimitExceeded {
            message: format!("{} API rate limit exceeded", provider),
        }
        .into();
    }

    let body = response.text().await.unwrap_or_default();
    AiProviderError::ApiError {
        provider: provider.to_string(),
        message: format!("HTTP {}: {}", status, body),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AiProviderError::MissingApiKey {
            provider: "gemini".to_string(),
            env_var: "GEMINI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));

        let err = AiProviderError::Timeout { seconds: 30 };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn create_provider_ollama_needs_no_key() {
        let config = AiConfig::default()
            .with_provider(AiProviderKind::Ollama)
            .with_model("llama3.2");

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "Ollama");
        assert_eq!(provider.model(), "llama3.2");
    }

    #[test]
    fn create_provider_gemini_missing_key() {
        let config = AiConfig::default().with_provider(AiProviderKind::Gemini);
        let result = create_provider(&config);
        assert!(result.is_err(), "Should fail without API key");
    }

    #[test]
    fn create_provider_with_config_keys() {
        let gemini = create_provider(&AiConfig::default().with_api_key("test-key")).unwrap();
        assert_eq!(gemini.name(), "Gemini");
        assert_eq!(gemini.model(), "gemini-2.5-flash");

        let openai = create_provider(
            &AiConfig::default()
                .with_provider(AiProviderKind::OpenAI)
                .with_api_key("test-key"),
        )
        .unwrap();
        assert_eq!(openai.name(), "OpenAI");
    }

    #[test]
    fn request_token_estimate_grows_with_content() {
        let small = GenerationRequest::prompt("hi");
        let large = GenerationRequest::prompt("x".repeat(4_000)).with_system("be brief");
        assert!(large.estimated_tokens() > small.estimated_tokens());
        assert_eq!(small.messages[0].role, Role::User);
    }
}
