//! Anthropic Messages API client.

use reqwest::header;
use serde::{Deserialize, Serialize};

use super::chat::{send_json, ChatMessage, Role};
use super::{http_client, TEMPERATURE};
use crate::config::ApiKey;
use crate::error::{Error, Result};
use crate::provider::{AnthropicSettings, ProviderIdentity};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for Anthropic Claude models.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    model: String,
}

impl AnthropicClient {
    pub fn new(settings: AnthropicSettings) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            base_url: settings
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: settings.api_key,
            model: settings.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one message exchange and return the concatenated text blocks.
    ///
    /// System messages are joined into the top-level `system` field.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let body = build_request(&self.model, messages);

        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header("x-api-key", api_key.expose_secret());
        }

        tracing::debug!(url = %url, model = %self.model, "Sending Anthropic message");
        let response: MessagesResponse = send_json(ProviderIdentity::Anthropic, request).await?;

        let text: Vec<String> = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(Error::Provider(
                "Provider 'anthropic' returned no text content".to_string(),
            ));
        }
        Ok(text.concat())
    }
}

fn build_request<'a>(model: &'a str, messages: &'a [ChatMessage]) -> MessagesRequest<'a> {
    let system: Vec<&str> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| m.content.as_str())
        .collect();

    let messages = messages
        .iter()
        .filter_map(|m| match m.role {
            Role::System => None,
            Role::User => Some(AnthropicMessage {
                role: "user",
                content: &m.content,
            }),
            Role::Assistant => Some(AnthropicMessage {
                role: "assistant",
                content: &m.content,
            }),
        })
        .collect();

    MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        system: (!system.is_empty()).then(|| system.join("\n\n")),
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_messages_are_lifted() {
        let messages = vec![
            ChatMessage::system("You grade answers."),
            ChatMessage::user("Is 2+2=4?"),
        ];
        let json = serde_json::to_value(build_request("claude-3", &messages)).unwrap();
        assert_eq!(json["system"], "You grade answers.");
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 1024);
    }

    #[test]
    fn test_no_system_field_without_system_messages() {
        let messages = vec![ChatMessage::user("hello")];
        let json = serde_json::to_value(build_request("claude-3", &messages)).unwrap();
        assert!(json.get("system").is_none());
    }

    #[test]
    fn test_default_base_url() {
        let client = AnthropicClient::new(AnthropicSettings {
            model: "claude-3-sonnet-20240229".to_string(),
            api_key: None,
            base_url: None,
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://api.anthropic.com");
    }
}
