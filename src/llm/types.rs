//! Chat completion API types
//!
//! Structs that mirror the OpenAI-compatible chat completions JSON format.
//! Used to serialize requests and deserialize API responses into typed
//! Rust structs.

use serde::{Deserialize, Serialize};

/// Role of a chat message author
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction
    System,
    /// End-user message
    User,
    /// Model-generated message
    Assistant,
}

/// A single role-tagged chat message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    /// Author role
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Build a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for the chat completions endpoint
#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,
    /// Conversation so far
    pub messages: Vec<ChatMessage>,
    /// Optional sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Top-level chat completions response
#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    /// Candidate completions (typically one)
    pub choices: Vec<Choice>,
}

/// A single candidate completion
#[derive(Deserialize, Debug)]
pub struct Choice {
    /// The generated message
    pub message: ResponseMessage,
    /// Why the model stopped generating (if reported)
    #[serde(default)]
    #[allow(dead_code)] // Part of API response format, may be used in future
    pub finish_reason: Option<String>,
}

/// The generated message within a choice
#[derive(Deserialize, Debug)]
pub struct ResponseMessage {
    /// Generated text (may be absent for non-text responses)
    #[serde(default)]
    pub content: Option<String>,
}
