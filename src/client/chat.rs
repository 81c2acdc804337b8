//! Chat message types and OpenAI-compatible wire format.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::provider::ProviderIdentity;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Chat completion request body (OpenAI and Azure OpenAI).
#[allow(dead_code)]
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
}

/// Chat completion response body (OpenAI and Azure OpenAI).
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ResponseMessage,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[allow(dead_code)]
impl ChatCompletionResponse {
    /// Content of the first choice.
    pub(crate) fn into_content(self, provider: ProviderIdentity) -> Result<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::Provider(format!("Provider '{}' returned no completion choices", provider))
            })
    }
}

/// Send a request and decode a JSON body, turning non-success statuses into
/// [`Error::Provider`].
pub(crate) async fn send_json<T>(provider: ProviderIdentity, request: reqwest::RequestBuilder) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let response = request.send().await.map_err(|e| {
        tracing::error!(error = %e, provider = %provider, "Failed to reach provider");
        Error::Provider(format!("Failed to reach provider '{}': {}", provider, e))
    })?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response.text().await.unwrap_or_default();
        tracing::error!(
            status = %status,
            provider = %provider,
            body = %error_body,
            "Provider returned error"
        );
        return Err(Error::Provider(format!(
            "Provider '{}' returned {}: {}",
            provider, status, error_body
        )));
    }

    response.json::<T>().await.map_err(|e| {
        Error::Provider(format!(
            "Provider '{}' returned an unreadable body: {}",
            provider, e
        ))
    })
}
