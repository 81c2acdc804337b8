//! Azure OpenAI chat client.

use reqwest::header;
use serde::{Deserialize, Serialize};

use super::chat::{send_json, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::{http_client, TEMPERATURE};
use crate::config::ApiKey;
use crate::error::{Error, Result};
use crate::provider::{AzureOpenAiSettings, ProviderIdentity};

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    input: &'a [&'a str],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Client bound to one Azure OpenAI chat deployment and its embedding deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    http: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    api_key: Option<ApiKey>,
    model: String,
    embedding_deployment: String,
    embedding_model: String,
}

impl AzureOpenAiClient {
    /// Fails with [`Error::InvalidSettings`] when the endpoint or deployment is missing.
    pub fn new(settings: AzureOpenAiSettings) -> Result<Self> {
        let endpoint = settings
            .api_base
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::InvalidSettings {
                provider: ProviderIdentity::AzureOpenAi,
                message: "an endpoint is required".to_string(),
            })?;
        let deployment = settings
            .deployment_name
            .filter(|d| !d.is_empty())
            .ok_or_else(|| Error::InvalidSettings {
                provider: ProviderIdentity::AzureOpenAi,
                message: "a deployment name is required".to_string(),
            })?;

        Ok(Self {
            http: http_client()?,
            endpoint,
            deployment,
            api_version: settings.api_version,
            api_key: settings.api_key,
            model: settings.model,
            embedding_deployment: settings.embedding_deployment,
            embedding_model: settings.embedding_model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn embedding_deployment(&self) -> &str {
        &self.embedding_deployment
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Send one non-streaming chat completion and return the reply text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions",
            self.endpoint.trim_end_matches('/'),
            self.deployment
        );
        let body = ChatCompletionRequest {
            model: Some(self.model.as_str()),
            messages,
            temperature: TEMPERATURE,
        };

        let mut request = self
            .http
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key.expose_secret());
        }

        tracing::debug!(
            url = %url,
            deployment = %self.deployment,
            api_version = %self.api_version,
            "Sending Azure OpenAI chat completion"
        );
        let response: ChatCompletionResponse =
            send_json(ProviderIdentity::AzureOpenAi, request).await?;
        response.into_content(ProviderIdentity::AzureOpenAi)
    }

    /// Embed each input on the embedding deployment. Vectors come back in input order.
    pub async fn embed(&self, input: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = format!(
            "{}/openai/deployments/{}/embeddings",
            self.endpoint.trim_end_matches('/'),
            self.embedding_deployment
        );
        let body = EmbeddingsRequest {
            input,
            model: &self.embedding_model,
        };

        let mut request = self
            .http
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header("api-key", api_key.expose_secret());
        }

        tracing::info!(
            chat_deployment = %self.deployment,
            embedding_deployment = %self.embedding_deployment,
            embedding_model = %self.embedding_model,
            inputs = input.len(),
            "Requesting Azure embeddings"
        );
        let response: EmbeddingsResponse =
            send_json(ProviderIdentity::AzureOpenAi, request).await?;

        if response.data.len() != input.len() {
            return Err(Error::Provider(format!(
                "Provider 'azure_openai' returned {} embeddings for {} inputs",
                response.data.len(),
                input.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}
