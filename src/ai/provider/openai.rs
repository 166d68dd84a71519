//! OpenAI Provider - Chat Completions API

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::super::config::AiConfig;
use super::{status_error, AiProvider, AiProviderError, Generation, GenerationRequest, Role};

/// OpenAI GPT API provider
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    client: reqwest::Client,
}

impl OpenAiProvider {
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn new(api_key: String, config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            api_key,
            model: config.model_name().to_string(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn messages(request: &GenerationRequest) -> Vec<WireMessage> {
        let system = request.system.iter().map(|s| WireMessage {
            role: "system".to_string(),
            content: s.clone(),
        });
        let turns = request.messages.iter().map(|m| WireMessage {
            role: match m.role {
                Role::User => "user",
                Role::Model => "assistant",
            }
            .to_string(),
            content: m.text.clone(),
        });
        system.chain(turns).collect()
    }

    async fn make_request(&self, body: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            return Err(status_error("OpenAI", response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse OpenAI API response")
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let start = Instant::now();
        let response = self
            .make_request(&ChatRequest {
                model: self.model.clone(),
                messages: Self::messages(request),
                max_tokens: Some(self.max_tokens),
                temperature: Some(self.temperature),
            })
            .await?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AiProviderError::InvalidResponse {
                provider: "OpenAI".to_string(),
                message: "response contained no choices".to_string(),
            })?;

        Ok(Generation::new(text)
            .with_tokens(response.usage.map(|u| u.total_tokens).unwrap_or(0))
            .with_response_time(start.elapsed().as_millis() as u64))
    }

    async fn health_check(&self) -> Result<bool> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: Self::messages(&GenerationRequest::prompt(
                "Respond with just the word 'ok'",
            )),
            max_tokens: Some(10),
            temperature: Some(0.0),
        };
        Ok(self.make_request(&body).await.is_ok())
    }
}

// API Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct TokenUsage {
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ChatMessage;

    #[test]
    fn system_instruction_leads_messages() {
        let request = GenerationRequest::default()
            .with_system("persona")
            .with_messages(vec![ChatMessage::user("q"), ChatMessage::model("a")]);

        let roles: Vec<_> = OpenAiProvider::messages(&request)
            .into_iter()
            .map(|m| m.role)
            .collect();
        assert_eq!(roles, vec!["system", "user", "assistant"]);
    }

    #[test]
    fn endpoint_respects_base_url() {
        let config = AiConfig::default().with_base_url("http://proxy.local/v1/");
        let provider = OpenAiProvider::new("k".to_string(), &config).unwrap();
        assert_eq!(provider.endpoint(), "http://proxy.local/v1/chat/completions");
    }
}
