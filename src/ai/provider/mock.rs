//! Mock Provider - Testing implementation
//!
//! Answers without network access. Can be scripted with canned replies,
//! a delay, or a forced failure, and records every request it receives.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AiProvider, Generation, GenerationRequest};

/// Mock AI provider for testing
pub struct MockProvider {
    model: String,
    delay_ms: u64,
    call_count: AtomicU32,
    responses: Arc<Mutex<Vec<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            model: "mock-model-v1".to_string(),
            delay_ms: 0,
            call_count: AtomicU32::new(0),
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Simulated response latency
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Queue a reply; queued replies are returned before generated ones
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push(text.into());
    }

    /// Make every following call fail with `message` (or succeed again with `None`)
    pub async fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().await = message.map(str::to_string);
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().await.last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }

        if let Some(message) = self.failure.lock().await.clone() {
            anyhow::bail!("{}", message);
        }

        let mut responses = self.responses.lock().await;
        if !responses.is_empty() {
            return Ok(Generation::new(responses.remove(0)).with_tokens(100));
        }

        let last = request
            .messages
            .last()
            .map(|m| m.text.as_str())
            .unwrap_or_default();
        Ok(Generation::new(format!(
            "Mock response ({} prior messages): {}",
            request.messages.len().saturating_sub(1),
            last.lines().next().unwrap_or_default().trim()
        ))
        .with_tokens(100)
        .with_response_time(self.delay_ms))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self.failure.lock().await.is_none())
    }
}
