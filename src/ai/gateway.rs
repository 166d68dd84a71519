//! Analysis Gateway - Remediation analysis and chat over an AI provider
//!
//! The gateway never fails: provider errors are logged and turned into
//! fixed fallback messages for the user. Chat history is kept per
//! conversation key (a report id, or `"general"`) and replayed
//! to the provider with each new message.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, warn};

use crate::report::{ScanReport, Vulnerability};

use super::config::AiConfig;
use super::prompt::{chat_instruction, conversation_key, remediation_prompt};
use super::provider::{create_provider, AiProvider, ChatMessage, Generation, GenerationRequest};
use super::rate_limit::RateLimiter;

/// Returned when no provider could be configured
pub const NOT_INITIALIZED_MESSAGE: &str = "AI assistant not initialized. Please check your API key.";
/// Returned when a remediation analysis fails
pub const ANALYSIS_ERROR_MESSAGE: &str = "Error analyzing vulnerability. Please try again.";
/// Returned when a chat reply fails
pub const CHAT_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Counters for gateway traffic
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GatewayStats {
    pub analyses: u64,
    pub chat_messages: u64,
    pub failures: u64,
    pub tokens_used: u64,
    pub total_response_time_ms: u64,
}

impl GatewayStats {
    /// Successful provider calls
    pub fn successful_calls(&self) -> u64 {
        (self.analyses + self.chat_messages).saturating_sub(self.failures)
    }

    pub fn avg_response_time_ms(&self) -> u64 {
        match self.successful_calls() {
            0 => 0,
            n => self.total_response_time_ms / n,
        }
    }
}

struct Conversation {
    system: String,
    history: Vec<ChatMessage>,
}

/// Marks the gateway busy for as long as it lives
struct LoadingGuard(Arc<AtomicUsize>);

impl LoadingGuard {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct AnalysisGateway {
    provider: Option<Arc<dyn AiProvider>>,
    rate_limiter: RateLimiter,
    conversations: Mutex<HashMap<String, Conversation>>,
    in_flight: Arc<AtomicUsize>,
    stats: RwLock<GatewayStats>,
}

impl AnalysisGateway {
    /// Build the configured provider. A missing API key leaves the gateway
    /// uninitialized; every request then answers [`NOT_INITIALIZED_MESSAGE`].
    pub fn from_config(config: &AiConfig) -> Self {
        let provider: Option<Arc<dyn AiProvider>> = match create_provider(config) {
            Ok(provider) => Some(Arc::from(provider)),
            Err(e) => {
                error!("AI provider unavailable: {:#}", e);
                None
            }
        };

        Self::build(
            provider,
            RateLimiter::new(config.rate_limit_rpm, config.rate_limit_tpm),
        )
    }

    /// Use `provider` directly, without rate limits
    pub fn with_provider(provider: Arc<dyn AiProvider>) -> Self {
        Self::build(Some(provider), RateLimiter::unlimited())
    }

    /// A gateway with no provider
    pub fn uninitialized() -> Self {
        Self::build(None, RateLimiter::unlimited())
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    fn build(provider: Option<Arc<dyn AiProvider>>, rate_limiter: RateLimiter) -> Self {
        Self {
            provider,
            rate_limiter,
            conversations: Mutex::new(HashMap::new()),
            in_flight: Arc::new(AtomicUsize::new(0)),
            stats: RwLock::new(GatewayStats::default()),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.provider.is_some()
    }

    /// "Provider (model)" for display
    pub fn describe(&self) -> Option<String> {
        self.provider
            .as_ref()
            .map(|p| format!("{} ({})", p.name(), p.model()))
    }

    /// True while any request is waiting on the provider
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Ask for a remediation plan for `vulnerability` within `report`
    pub async fn request_analysis(&self, vulnerability: &Vulnerability, report: &ScanReport) -> String {
        let Some(provider) = self.provider.clone() else {
            return NOT_INITIALIZED_MESSAGE.to_string();
        };
        let _loading = LoadingGuard::enter(&self.in_flight);
        self.stats.write().await.analyses += 1;

        debug!("Requesting analysis of {} in {}", vulnerability.id, report.id);
        let request = GenerationRequest::prompt(remediation_prompt(vulnerability, report));
        match self.call(provider.as_ref(), &request).await {
            Ok(generation) => generation.text,
            Err(e) => {
                warn!("Analysis of {} failed: {:#}", vulnerability.id, e);
                ANALYSIS_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// Send `message` in the conversation for `report` (or the general one)
    ///
    /// Blank messages are ignored and answer with an empty string.
    pub async fn send_chat_message(&self, report: Option<&ScanReport>, message: &str) -> String {
        let message = message.trim();
        if message.is_empty() {
            return String::new();
        }
        let Some(provider) = self.provider.clone() else {
            return NOT_INITIALIZED_MESSAGE.to_string();
        };
        let _loading = LoadingGuard::enter(&self.in_flight);
        self.stats.write().await.chat_messages += 1;

        let key = conversation_key(report).to_string();
        let request = {
            let mut conversations = self.conversations.lock().await;
            let conversation = conversations.entry(key.clone()).or_insert_with(|| {
                debug!("Starting conversation {}", key);
                Conversation {
                    system: chat_instruction(report),
                    history: Vec::new(),
                }
            });

            let mut messages = conversation.history.clone();
            messages.push(ChatMessage::user(message));
            GenerationRequest::default()
                .with_system(conversation.system.clone())
                .with_messages(messages)
        };

        match self.call(provider.as_ref(), &request).await {
            Ok(generation) => {
                // The conversation may have been reset while waiting
                if let Some(conversation) = self.conversations.lock().await.get_mut(&key) {
                    conversation.history.push(ChatMessage::user(message));
                    conversation.history.push(ChatMessage::model(generation.text.clone()));
                }
                generation.text
            }
            Err(e) => {
                warn!("Chat message in {} failed: {:#}", key, e);
                CHAT_ERROR_MESSAGE.to_string()
            }
        }
    }

    async fn call(&self, provider: &dyn AiProvider, request: &GenerationRequest) -> anyhow::Result<Generation> {
        let estimated = request.estimated_tokens();
        self.rate_limiter.acquire(estimated).await;

        let result = provider.generate(request).await;
        let mut stats = self.stats.write().await;
        match &result {
            Ok(generation) => {
                self.rate_limiter
                    .record_tokens(generation.tokens_used, estimated)
                    .await;
                stats.tokens_used += u64::from(generation.tokens_used);
                stats.total_response_time_ms += generation.response_time_ms;
            }
            Err(_) => stats.failures += 1,
        }
        result
    }

    /// Messages recorded in a conversation, oldest first
    pub async fn history(&self, key: &str) -> Vec<ChatMessage> {
        self.conversations
            .lock()
            .await
            .get(key)
            .map(|c| c.history.clone())
            .unwrap_or_default()
    }

    /// Forget a conversation; the next message starts it afresh
    pub async fn reset_conversation(&self, key: &str) -> bool {
        self.conversations.lock().await.remove(key).is_some()
    }

    pub async fn stats(&self) -> GatewayStats {
        self.stats.read().await.clone()
    }
}

impl std::fmt::Debug for AnalysisGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisGateway")
            .field("provider", &self.describe())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish()
    }
}
