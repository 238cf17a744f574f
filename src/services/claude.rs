use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A service that completes a text prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String>;
}

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl ClaudeClient {
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ProviderUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        })
    }
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url);

        tracing::debug!("Calling Claude model {} (max_tokens={})", self.model, max_tokens);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&MessagesRequest {
                model: &self.model,
                max_tokens,
                messages: vec![Message {
                    role: "user",
                    content: prompt,
                }],
            })
            .send()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Failed to call Claude API: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::ProviderUnavailable(format!("Failed to read Claude response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::ProviderUnavailable(describe_failure(status, &body)));
        }

        extract_text(&body)
    }
}

fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => format!(
            "Claude API returned {} ({}): {}",
            status, envelope.error.error_type, envelope.error.message
        ),
        Err(_) => format!(
            "Claude API returned {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        ),
    }
}

fn extract_text(body: &str) -> Result<String> {
    let parsed: MessagesResponse = serde_json::from_str(body)
        .map_err(|e| AppError::ProviderUnavailable(format!("Failed to parse Claude response: {}", e)))?;

    let text: Vec<String> = parsed
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();

    if text.is_empty() {
        return Err(AppError::ProviderUnavailable(
            "Invalid response format from Claude".to_string(),
        ));
    }

    Ok(text.join("\n"))
}
