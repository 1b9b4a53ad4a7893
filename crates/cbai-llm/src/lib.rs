//! Thin chat-completion client used by actions.

pub mod client;
pub mod error;
pub mod http;

pub use client::{AiClient, AiResponse, TokenUsage};
pub use error::LlmError;
