//! Ollama Provider - Local model integration
//!
//! Talks to a locally running Ollama server through `/api/chat`.
//! Needs no API key, so it works air-gapped.

use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::super::config::AiConfig;
use super::{status_error, AiProvider, AiProviderError, Generation, GenerationRequest, Role};

/// Ollama local model provider
pub struct OllamaProvider {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OllamaProvider {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:11434";

    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            model: config.model_name().to_string(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url.trim_end_matches('/'))
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatRequest {
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

        ChatRequest {
            model: self.model.clone(),
            messages: system.chain(turns).collect(),
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "Ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let start = Instant::now();

        let response = self
            .client
            .post(self.chat_url())
            .json(&self.build_body(request))
            .send()
            .await
            .context("Failed to send request to Ollama API")?;

        if !response.status().is_success() {
            return Err(status_error("Ollama", response).await);
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama API response")?;

        if reply.message.content.trim().is_empty() {
            return Err(AiProviderError::InvalidResponse {
                provider: "Ollama".to_string(),
                message: "empty reply".to_string(),
            }
            .into());
        }

        let tokens = reply.prompt_eval_count.unwrap_or(0) + reply.eval_count.unwrap_or(0);
        Ok(Generation::new(reply.message.content)
            .with_tokens(tokens)
            .with_response_time(start.elapsed().as_millis() as u64))
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self.client.get(self.tags_url()).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }

        // The server is up; make sure the model is pulled
        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .iter()
            .any(|m| m.name == self.model || m.name.starts_with(&format!("{}:", self.model))))
    }
}

// API Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: WireMessage,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}
