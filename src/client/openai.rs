//! OpenAI chat client.

use reqwest::header;

use super::chat::{send_json, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::{http_client, TEMPERATURE};
use crate::config::ApiKey;
use crate::error::Result;
use crate::provider::{OpenAiSettings, ProviderIdentity};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for the OpenAI chat completions API or any compatible endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<ApiKey>,
    model: String,
}

impl OpenAiClient {
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
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

    /// Send one non-streaming chat completion and return the reply text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = ChatCompletionRequest {
            model: Some(self.model.as_str()),
            messages,
            temperature: TEMPERATURE,
        };

        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        tracing::debug!(url = %url, model = %self.model, "Sending OpenAI chat completion");
        let response: ChatCompletionResponse = send_json(ProviderIdentity::OpenAi, request).await?;
        response.into_content(ProviderIdentity::OpenAi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let client = OpenAiClient::new(OpenAiSettings {
            model: "gpt-4".to_string(),
            api_key: None,
            base_url: None,
        })
        .unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(client.model(), "gpt-4");
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = OpenAiClient::new(OpenAiSettings {
            model: "gpt-4".to_string(),
            api_key: Some(ApiKey::from("sk-do-not-print")),
            base_url: None,
        })
        .unwrap();
        assert!(!format!("{:?}", client).contains("sk-do-not-print"));
    }
}
