//! Gemini Provider - Google Generative Language API
//!
//! Uses the `generateContent` endpoint with a system instruction and
//! the conversation as alternating `user`/`model` contents.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::super::config::AiConfig;
use super::{status_error, AiProvider, AiProviderError, Generation, GenerationRequest, Role};

/// Google Gemini provider
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

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
            timeout: config.timeout(),
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn build_body(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: request.system.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            contents: request
                .messages
                .iter()
                .map(|m| Content {
                    role: Some(
                        match m.role {
                            Role::User => "user",
                            Role::Model => "model",
                        }
                        .to_string(),
                    ),
                    parts: vec![Part {
                        text: m.text.clone(),
                    }],
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_tokens,
            },
        }
    }

    async fn post(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        debug!("Sending Gemini request to {}", self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| -> anyhow::Error {
                if e.is_timeout() {
                    AiProviderError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                    .into()
                } else {
                    anyhow::Error::new(e).context("Failed to send request to Gemini API")
                }
            })?;

        if !response.status().is_success() {
            return Err(status_error("Gemini", response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse Gemini API response")
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        let start = Instant::now();
        let response = self.post(&self.build_body(request)).await?;

        let text = response.text().ok_or_else(|| AiProviderError::InvalidResponse {
            provider: "Gemini".to_string(),
            message: "response contained no candidate text".to_string(),
        })?;

        let tokens = response
            .usage_metadata
            .map(|u| u.total_token_count)
            .unwrap_or(0);

        Ok(Generation::new(text)
            .with_tokens(tokens)
            .with_response_time(start.elapsed().as_millis() as u64))
    }

    async fn health_check(&self) -> Result<bool> {
        let request = GenerationRequest::prompt("Respond with just the word 'ok'");
        let mut body = self.build_body(&request);
        body.generation_config.max_output_tokens = 10;

        Ok(self.post(&body).await.is_ok())
    }
}

// API Request/Response types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::provider::ChatMessage;

    fn provider() -> GeminiProvider {
        GeminiProvider::new("key".to_string(), &AiConfig::default()).unwrap()
    }

    #[test]
    fn endpoint_includes_model() {
        assert_eq!(
            provider().endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn request_body_shape() {
        let request = GenerationRequest::default()
            .with_system("You are helpful")
            .with_messages(vec![ChatMessage::user("hi"), ChatMessage::model("hello")]);

        let body = serde_json::to_value(provider().build_body(&request)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are helpful");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
    }

    #[test]
    fn response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"a"},{"text":"b"}]}}],
                "usageMetadata":{"totalTokenCount":42}}"#,
        )
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("ab"));
        assert_eq!(response.usage_metadata.unwrap().total_token_count, 42);

        let empty: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(empty.text().is_none());
    }
}
