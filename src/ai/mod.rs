//! AI Module - Remediation analysis and chat assistant
//!
//! The [`AnalysisGateway`] fronts a text-generation provider (Gemini by
//! default, OpenAI, a local Ollama, or a mock for tests).
//!
//! # Example
//!
//! ```rust,ignore
//! use reconx::ai::{AiConfig, AnalysisGateway};
//!
//! let mut config = AiConfig::default();
//! config.load_api_key_from_env();
//! let gateway = AnalysisGateway::from_config(&config);
//!
//! let reply = gateway.send_chat_message(None, "What is SSRF?").await;
//! println!("{}", reply);
//! ```

pub mod config;
pub mod gateway;
pub mod notes;
pub mod prompt;
pub mod provider;
pub mod rate_limit;

pub use config::{AiConfig, AiProvider as AiProviderKind};
pub use gateway::{
    AnalysisGateway, GatewayStats, ANALYSIS_ERROR_MESSAGE, CHAT_ERROR_MESSAGE,
    NOT_INITIALIZED_MESSAGE,
};
pub use notes::{AnalysisNote, AnalysisNotes};
pub use prompt::GENERAL_CONVERSATION;
pub use provider::{AiProvider, ChatMessage, Generation, GenerationRequest, MockProvider, Role};
pub use rate_limit::{RateLimitStats, RateLimiter};
