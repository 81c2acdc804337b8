//! Google Gemini client.

use reqwest::header;
use serde::{Deserialize, Serialize};

use super::chat::{send_json, ChatMessage, Role};
use super::{http_client, TEMPERATURE};
use crate::config::ApiKey;
use crate::error::{Error, Result};
use crate::provider::{GoogleSettings, ProviderIdentity};

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for Gemini models on the Generative Language API.
#[derive(Debug, Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<ApiKey>,
    model: String,
    project: Option<String>,
    location: String,
}

impl GoogleClient {
    pub fn new(settings: GoogleSettings) -> Result<Self> {
        Ok(Self {
            http: http_client()?,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: settings.api_key,
            model: settings.model,
            project: settings.project,
            location: settings.location,
        })
    }

    /// Point the client at a different API host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Generate content for the conversation and return the first candidate's text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let body = build_request(messages);

        let mut request = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.query(&[("key", api_key.expose_secret())]);
        }

        tracing::debug!(url = %url, model = %self.model, "Sending Gemini generateContent");
        let response: GenerateContentResponse = send_json(ProviderIdentity::Google, request).await?;

        response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| Error::Provider("Provider 'google' returned no candidates".to_string()))
    }
}

fn build_request(messages: &[ChatMessage]) -> GenerateContentRequest<'_> {
    let system_parts: Vec<Part<'_>> = messages
        .iter()
        .filter(|m| m.role == Role::System)
        .map(|m| Part { text: &m.content })
        .collect();

    let contents = messages
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                Role::System => return None,
                Role::User => "user",
                Role::Assistant => "model",
            };
            Some(Content {
                role: Some(role),
                parts: vec![Part { text: &m.content }],
            })
        })
        .collect();

    GenerateContentRequest {
        contents,
        system_instruction: (!system_parts.is_empty()).then(|| Content {
            role: None,
            parts: system_parts,
        }),
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}
