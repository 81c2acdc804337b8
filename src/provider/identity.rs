//! Provider identities.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// The fixed set of LLM backends this crate can resolve and instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderIdentity {
    #[serde(rename = "azure_openai")]
    AzureOpenAi,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "ollama")]
    Ollama,
}

impl ProviderIdentity {
    /// Every identity, in detection priority order.
    pub const ALL: [ProviderIdentity; 5] = [
        ProviderIdentity::AzureOpenAi,
        ProviderIdentity::OpenAi,
        ProviderIdentity::Anthropic,
        ProviderIdentity::Google,
        ProviderIdentity::Ollama,
    ];

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderIdentity::AzureOpenAi => "azure_openai",
            ProviderIdentity::OpenAi => "openai",
            ProviderIdentity::Anthropic => "anthropic",
            ProviderIdentity::Google => "google",
            ProviderIdentity::Ollama => "ollama",
        }
    }

    /// Cargo feature that compiles this provider's client adapter.
    pub fn feature(&self) -> &'static str {
        match self {
            ProviderIdentity::AzureOpenAi => "azure-openai",
            ProviderIdentity::OpenAi => "openai",
            ProviderIdentity::Anthropic => "anthropic",
            ProviderIdentity::Google => "google",
            ProviderIdentity::Ollama => "ollama",
        }
    }
}

impl std::fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderIdentity::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnsupportedProvider {
                name: s.to_string(),
            })
    }
}
