//! Client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, LlmClient, Role};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generation can stall on the provider side; cap each request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gemini REST API client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
}

impl GeminiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> anyhow::Result<String> {
        let mut contents = Vec::new();
        let mut system_instruction = None;

        for message in messages {
            let part = Part {
                text: message.content.clone(),
            };
            match message.role {
                Role::System => {
                    system_instruction = Some(Content {
                        role: None,
                        parts: vec![part],
                    });
                }
                Role::User => contents.push(Content {
                    role: Some("user".to_string()),
                    parts: vec![part],
                }),
                Role::Assistant => contents.push(Content {
                    role: Some("model".to_string()),
                    parts: vec![part],
                }),
            }
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            API_BASE, model, self.api_key
        );
        let request = GenerateContentRequest {
            contents,
            system_instruction,
        };

        tracing::debug!("Requesting completion from model {}", model);

        let response = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LLM API error ({}): {}", status, truncate(&body, 500));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("LLM returned empty response");
        }

        Ok(text)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}... [truncated]", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_is_joined_from_parts() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "FUNCTION_CALL: "}, {"text": "open_canvas"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).expect("parse response");
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();
        assert_eq!(text, "FUNCTION_CALL: open_canvas");
    }

    #[test]
    fn missing_candidates_yields_empty_text() {
        let parsed: GenerateContentResponse =
            serde_json::from_str("{}").expect("parse empty response");
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn truncate_preserves_short_strings() {
        assert_eq!(truncate("short", 500), "short");
        assert!(truncate(&"x".repeat(600), 500).ends_with("[truncated]"));
    }
}
