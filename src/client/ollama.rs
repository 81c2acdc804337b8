//! Ollama chat client.

use reqwest::header;
use serde::{Deserialize, Serialize};

use super::chat::{send_json, ChatMessage};
use super::{http_client, TEMPERATURE};
use crate::error::Result;
use crate::provider::{OllamaSettings, ProviderIdentity};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: Options,
}

#[derive(Debug, Serialize)]
struct Options {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Client for a local or remote Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(settings: OllamaSettings) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: settings.base_url,
            model: settings.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options: Options {
                temperature: TEMPERATURE,
            },
        };

        let request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        tracing::debug!(url = %url, model = %self.model, "Sending Ollama chat");
        let response: ChatResponse = send_json(ProviderIdentity::Ollama, request).await?;
        Ok(response.message.content)
    }
}
