//! Chat-completion client: a trait seam plus the OpenAI-compatible
//! implementation used in production. Handlers hold the client as
//! `Arc<dyn CompletionClient>` so tests can substitute a fake.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::CompletionSettings;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion backend returned {status}: {snippet}")]
    Status {
        status: reqwest::StatusCode,
        snippet: String,
    },
    #[error("completion response contained no choices")]
    EmptyChoices,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `prompt` as a single-turn user message and returns the
    /// generated text.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

pub type DynCompletionClient = Arc<dyn CompletionClient>;

/// Non-streaming client for `POST {endpoint}/v1/chat/completions`.
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    url_chat: String,
}

impl OpenAiClient {
    pub fn new(settings: &CompletionSettings) -> anyhow::Result<Self> {
        let endpoint = settings.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            anyhow::bail!("completion endpoint {endpoint:?} must be http(s)");
        }

        let mut headers = header::HeaderMap::new();
        let mut auth =
            header::HeaderValue::from_str(&format!("Bearer {}", settings.api_key.expose_secret()))
                .context("API key is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            model: settings.model.clone(),
            url_chat: format!("{}/v1/chat/completions", endpoint.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let started = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "POST {}", self.url_chat);

        let resp = self.client.post(&self.url_chat).json(&body).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            let snippet = make_snippet(&text);
            tracing::error!(
                %status,
                %snippet,
                latency_ms = started.elapsed().as_millis(),
                "completion backend returned non-success status"
            );
            return Err(CompletionError::Status { status, snippet });
        }

        let out: ChatResponse = resp.json().await?;
        let content = out
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or(CompletionError::EmptyChoices)?;

        tracing::info!(
            model = %self.model,
            latency_ms = started.elapsed().as_millis(),
            "chat completion completed"
        );
        Ok(content)
    }
}

fn make_snippet(text: &str) -> String {
    const MAX: usize = 256;
    let mut snippet: String = text.chars().take(MAX).collect();
    if text.chars().count() > MAX {
        snippet.push('…');
    }
    snippet
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Deserialize)]
struct ChatMessageOut {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_is_a_single_user_message() {
        let body = ChatRequest {
            model: "gpt-3.5-turbo",
            messages: vec![ChatMessage {
                role: "user",
                content: "What is 2+2?",
            }],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "What is 2+2?");
    }

    #[test]
    fn response_content_is_extracted_from_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"4"}}]}"#;
        let out: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = out.choices.into_iter().find_map(|c| c.message.content);
        assert_eq!(content.as_deref(), Some("4"));
    }

    #[test]
    fn snippet_is_bounded() {
        let text = "x".repeat(1000);
        let snippet = make_snippet(&text);
        assert!(snippet.chars().count() <= 257);
    }
}
