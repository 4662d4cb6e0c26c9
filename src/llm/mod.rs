//! LLM provider collaborator
//!
//! The provider is an opaque remote chat API: it takes a model identifier,
//! a list of role-tagged messages and an optional sampling temperature, and
//! returns generated text. Network failure modes (timeout, rate limit, auth
//! error) are surfaced verbatim to the caller.
//!
//! Workflows depend on the [`ChatProvider`] trait rather than a concrete
//! client so they can be exercised with scripted providers in tests.

pub mod client;
pub mod types;

pub use client::OpenAiClient;
pub use types::{ChatMessage, Role};

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a chat completion call
#[derive(Error, Debug)]
pub enum LlmError {
    /// The HTTP request could not be sent or the transport failed
    #[error("Failed to send request to LLM provider: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the request with HTTP 429
    #[error("LLM provider rate limit exceeded (HTTP {status}): {body}")]
    RateLimited {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The provider rejected the credentials (HTTP 401/403)
    #[error("LLM provider rejected credentials (HTTP {status}): {body}")]
    Auth {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Any other non-success HTTP status
    #[error("LLM provider returned error status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The response body could not be parsed
    #[error("Failed to parse LLM response: {0}")]
    InvalidResponse(String),

    /// The response contained no choices or no text content
    #[error("LLM response contained no content")]
    Empty,
}

/// A chat completion collaborator
///
/// One method: submit messages, get generated text. Implemented by
/// [`OpenAiClient`] in production and by scripted fakes in tests.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generate a completion for the given messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: Option<f32>,
    ) -> Result<String, LlmError>;
}
