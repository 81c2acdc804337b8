//! Provider client instantiation.
//!
//! Maps a resolved [`ProviderSettings`] record onto the matching client
//! adapter. Each adapter is compiled behind its own cargo feature; asking for
//! a provider whose feature is off fails with [`Error::MissingDependency`]
//! rather than substituting another provider.

#[cfg(feature = "anthropic")]
mod anthropic;
#[cfg(feature = "azure-openai")]
mod azure;
mod chat;
#[cfg(feature = "google")]
mod google;
#[cfg(feature = "ollama")]
mod ollama;
#[cfg(feature = "openai")]
mod openai;

use std::time::Duration;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicClient;
#[cfg(feature = "azure-openai")]
pub use azure::AzureOpenAiClient;
pub use chat::{ChatMessage, Role};
#[cfg(feature = "google")]
pub use google::GoogleClient;
#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;
#[cfg(feature = "openai")]
pub use openai::OpenAiClient;

use crate::error::{Error, Result};
use crate::provider::{
    AnthropicSettings, AzureOpenAiSettings, ConfigMapping, EnvironmentView, GoogleSettings,
    OllamaSettings, OpenAiSettings, ProviderIdentity, ProviderSettings, Resolver,
};

/// Sampling temperature used for every provider. Not configurable.
pub const TEMPERATURE: f32 = 0.0;

/// A ready-to-use client for the resolved provider.
#[derive(Debug, Clone)]
pub enum LlmClient {
    #[cfg(feature = "azure-openai")]
    AzureOpenAi(AzureOpenAiClient),
    #[cfg(feature = "openai")]
    OpenAi(OpenAiClient),
    #[cfg(feature = "anthropic")]
    Anthropic(AnthropicClient),
    #[cfg(feature = "google")]
    Google(GoogleClient),
    #[cfg(feature = "ollama")]
    Ollama(OllamaClient),
}

impl LlmClient {
    pub fn provider(&self) -> ProviderIdentity {
        match self {
            #[cfg(feature = "azure-openai")]
            LlmClient::AzureOpenAi(_) => ProviderIdentity::AzureOpenAi,
            #[cfg(feature = "openai")]
            LlmClient::OpenAi(_) => ProviderIdentity::OpenAi,
            #[cfg(feature = "anthropic")]
            LlmClient::Anthropic(_) => ProviderIdentity::Anthropic,
            #[cfg(feature = "google")]
            LlmClient::Google(_) => ProviderIdentity::Google,
            #[cfg(feature = "ollama")]
            LlmClient::Ollama(_) => ProviderIdentity::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            #[cfg(feature = "azure-openai")]
            LlmClient::AzureOpenAi(c) => c.model(),
            #[cfg(feature = "openai")]
            LlmClient::OpenAi(c) => c.model(),
            #[cfg(feature = "anthropic")]
            LlmClient::Anthropic(c) => c.model(),
            #[cfg(feature = "google")]
            LlmClient::Google(c) => c.model(),
            #[cfg(feature = "ollama")]
            LlmClient::Ollama(c) => c.model(),
        }
    }

    pub fn temperature(&self) -> f32 {
        TEMPERATURE
    }

    /// Send one chat request and return the reply text.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        match self {
            #[cfg(feature = "azure-openai")]
            LlmClient::AzureOpenAi(c) => c.complete(messages).await,
            #[cfg(feature = "openai")]
            LlmClient::OpenAi(c) => c.complete(messages).await,
            #[cfg(feature = "anthropic")]
            LlmClient::Anthropic(c) => c.complete(messages).await,
            #[cfg(feature = "google")]
            LlmClient::Google(c) => c.complete(messages).await,
            #[cfg(feature = "ollama")]
            LlmClient::Ollama(c) => c.complete(messages).await,
        }
    }
}

/// Build the client for `identity` from its settings.
///
/// # Errors
///
/// - [`Error::ProviderMismatch`] if `settings` belong to another provider
/// - [`Error::MissingDependency`] if the provider's feature is not compiled in
/// - Any error raised while constructing the adapter itself
pub fn instantiate(identity: ProviderIdentity, settings: ProviderSettings) -> Result<LlmClient> {
    let found = settings.provider();
    if found != identity {
        return Err(Error::ProviderMismatch {
            expected: identity,
            found,
        });
    }

    let client = match settings {
        ProviderSettings::AzureOpenAi(s) => build_azure_openai(s)?,
        ProviderSettings::OpenAi(s) => build_openai(s)?,
        ProviderSettings::Anthropic(s) => build_anthropic(s)?,
        ProviderSettings::Google(s) => build_google(s)?,
        ProviderSettings::Ollama(s) => build_ollama(s)?,
    };

    tracing::info!(
        provider = %client.provider(),
        model = %client.model(),
        temperature = %TEMPERATURE,
        "Created LLM client"
    );
    Ok(client)
}

/// [`instantiate`] with the provider given by its canonical name.
pub fn instantiate_named(provider: &str, settings: ProviderSettings) -> Result<LlmClient> {
    let identity = provider.parse::<ProviderIdentity>().inspect_err(|_| {
        tracing::error!(provider = %provider, "Unsupported provider type");
    })?;
    instantiate(identity, settings)
}

/// Resolve a provider from parameters and build its client in one step.
pub fn create_client(
    resolver: &Resolver,
    config: &ConfigMapping,
    env: &EnvironmentView,
) -> Result<LlmClient> {
    let (identity, settings) = resolver.resolve(config, env);
    instantiate(identity, settings)
}

/// Shared HTTP client settings for every adapter.
#[allow(dead_code)]
fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .build()?)
}

#[allow(dead_code)]
fn missing_dependency(provider: ProviderIdentity) -> Error {
    tracing::error!(
        provider = %provider,
        feature = %provider.feature(),
        "Missing dependency for provider"
    );
    Error::MissingDependency {
        provider,
        feature: provider.feature(),
    }
}

#[cfg(feature = "azure-openai")]
fn build_azure_openai(settings: AzureOpenAiSettings) -> Result<LlmClient> {
    Ok(LlmClient::AzureOpenAi(AzureOpenAiClient::new(settings)?))
}

#[cfg(not(feature = "azure-openai"))]
fn build_azure_openai(_settings: AzureOpenAiSettings) -> Result<LlmClient> {
    Err(missing_dependency(ProviderIdentity::AzureOpenAi))
}

#[cfg(feature = "openai")]
fn build_openai(settings: OpenAiSettings) -> Result<LlmClient> {
    Ok(LlmClient::OpenAi(OpenAiClient::new(settings)?))
}

#[cfg(not(feature = "openai"))]
fn build_openai(_settings: OpenAiSettings) -> Result<LlmClient> {
    Err(missing_dependency(ProviderIdentity::OpenAi))
}

#[cfg(feature = "anthropic")]
fn build_anthropic(settings: AnthropicSettings) -> Result<LlmClient> {
    Ok(LlmClient::Anthropic(AnthropicClient::new(settings)?))
}

#[cfg(not(feature = "anthropic"))]
fn build_anthropic(_settings: AnthropicSettings) -> Result<LlmClient> {
    Err(missing_dependency(ProviderIdentity::Anthropic))
}

#[cfg(feature = "google")]
fn build_google(settings: GoogleSettings) -> Result<LlmClient> {
    Ok(LlmClient::Google(GoogleClient::new(settings)?))
}

#[cfg(not(feature = "google"))]
fn build_google(_settings: GoogleSettings) -> Result<LlmClient> {
    Err(missing_dependency(ProviderIdentity::Google))
}

#[cfg(feature = "ollama")]
fn build_ollama(settings: OllamaSettings) -> Result<LlmClient> {
    Ok(LlmClient::Ollama(OllamaClient::new(settings)?))
}

#[cfg(not(feature = "ollama"))]
fn build_ollama(_settings: OllamaSettings) -> Result<LlmClient> {
    Err(missing_dependency(ProviderIdentity::Ollama))
}
