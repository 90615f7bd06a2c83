//! LLM provider abstraction.
//!
//! The agent only needs plain text completions: it sends the system prompt
//! plus the current query and decodes the reply itself. The trait exists so
//! tests can substitute a scripted client.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Message role in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A text-completion LLM backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Request a completion for the given conversation and return its text.
    async fn chat_completion(&self, model: &str, messages: &[ChatMessage])
        -> anyhow::Result<String>;
}
