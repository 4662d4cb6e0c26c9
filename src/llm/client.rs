//! OpenAI-compatible chat completions client
//!
//! Direct HTTP client for the chat completions endpoint. The shared
//! `reqwest::Client` is passed in at construction so connections are pooled
//! across calls and workflows.

use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::llm::{ChatProvider, LlmError};
use async_trait::async_trait;

/// Chat completions client for an OpenAI-compatible API
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for the given base URL
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client (connection pooling)
    /// * `api_key` - Bearer token for the provider
    /// * `model` - Model identifier sent with every request
    /// * `base_url` - API base URL (e.g. `https://api.openai.com/v1`)
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Model identifier this client sends with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete_inner(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::Auth {
                status: 0,
                body: "API key is empty".to_string(),
            });
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature,
        };

        tracing::debug!(
            url = %url,
            model = %self.model,
            num_messages = messages.len(),
            temperature = ?temperature,
            "Calling chat completions API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            tracing::error!(
                status_code = status_code,
                error_body = %error_body,
                "Chat completions API returned error status"
            );

            return Err(match status_code {
                429 => LlmError::RateLimited {
                    status: status_code,
                    body: error_body,
                },
                401 | 403 => LlmError::Auth {
                    status: status_code,
                    body: error_body,
                },
                _ => LlmError::Api {
                    status: status_code,
                    body: error_body,
                },
            });
        }

        let response_body = response.text().await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&response_body).map_err(|e| {
            LlmError::InvalidResponse(format!(
                "{} - Response body: {}",
                e, response_body
            ))
        })?;

        let choice = parsed.choices.first().ok_or(LlmError::Empty)?;
        let text = choice
            .message
            .content
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(LlmError::Empty)?;

        tracing::debug!(
            response_len = text.len(),
            "Successfully received chat completion"
        );

        Ok(text.to_string())
    }
}

#[async_trait]
impl ChatProvider for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, LlmError> {
        self.complete_inner(messages, temperature).await
    }
}
