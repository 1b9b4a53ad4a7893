//! OpenAI-compatible chat-completion client.
//!
//! Every provider kind except `anthropic` is reached through the same
//! `/chat/completions` wire shape; only the base URL and key differ.

use serde::{Deserialize, Serialize};

use cbai_core::config::ProviderConfig;

use crate::error::LlmError;

const DEFAULT_LOCAL_URL: &str = "http://localhost:11434/v1";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    model: String,
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

pub struct AiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for AiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl AiClient {
    /// Build a client from the agent's provider configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::UnsupportedProvider`] for the `anthropic` kind,
    /// which does not speak the OpenAI wire format.
    pub fn new(provider: &ProviderConfig) -> Result<Self, LlmError> {
        if provider.kind == "anthropic" {
            return Err(LlmError::UnsupportedProvider {
                kind: provider.kind.clone(),
            });
        }

        let mut base_url = provider
            .endpoint
            .clone()
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| default_base_url(&provider.kind).to_owned());
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            client: crate::http::default_client(),
            base_url,
            api_key: provider
                .api_key
                .clone()
                .unwrap_or_else(|| "dummy-key-for-local".to_owned()),
            model: provider.model.clone(),
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// One-shot prompt/response call.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx provider status,
    /// or a completion with no choices.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<AiResponse, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let body = ChatRequest {
            model: &self.model,
            messages,
            temperature: 0.7,
            max_tokens: 1024,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), "provider rejected request");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletion = response.json().await?;
        let Some(choice) = completion.choices.into_iter().next() else {
            return Err(LlmError::EmptyResponse);
        };

        Ok(AiResponse {
            content: choice.message.content.unwrap_or_default(),
            model: completion.model,
            usage: completion.usage.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
            }),
        })
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Summarize the following text concisely:\n\n{text}"),
                Some("You are a helpful assistant that provides clear, concise summaries."),
            )
            .await?;
        Ok(response.content)
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn explain(&self, text: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Explain the following:\n\n{text}"),
                Some("You are a helpful assistant that explains things clearly. If this looks like code, explain what it does."),
            )
            .await?;
        Ok(response.content)
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Translate the following to {target_lang}:\n\n{text}"),
                Some("You are a translator. Only output the translation, nothing else."),
            )
            .await?;
        Ok(response.content)
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn improve(&self, text: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Improve the following writing for clarity and style:\n\n{text}"),
                Some("You are an editor. Improve the text while preserving its meaning. Only output the improved text."),
            )
            .await?;
        Ok(response.content)
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn extract_data(&self, text: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Extract structured data from the following text. Output as JSON if applicable:\n\n{text}"),
                Some("You are a data extraction assistant. Extract key information in a structured format."),
            )
            .await?;
        Ok(response.content)
    }

    /// # Errors
    ///
    /// Propagates [`Self::generate`] failures.
    pub async fn classify(&self, text: &str) -> Result<String, LlmError> {
        let response = self
            .generate(
                &format!("Classify this content:\n\n{text}"),
                Some(r#"You are a content classifier. Categorize the given text into exactly one of these categories: email, code, url, log, article, chat, command, data, error, other. Respond with JSON only: {"category": "...", "confidence": 0.0-1.0, "reasoning": "..."}"#),
            )
            .await?;
        Ok(response.content)
    }
}

fn default_base_url(kind: &str) -> &'static str {
    match kind {
        "openai" => DEFAULT_OPENAI_URL,
        _ => DEFAULT_LOCAL_URL,
    }
}
