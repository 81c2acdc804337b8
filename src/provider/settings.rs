//! Normalized per-provider settings.

use serde::Serialize;

use super::identity::ProviderIdentity;
use super::params::{
    ConfigMapping, EnvironmentView, Namespace, ANTHROPIC_API_KEY_VAR, GOOGLE_API_KEY_VAR,
    OPENAI_API_KEY_VAR,
};
use crate::config::ApiKey;

const DEFAULT_AZURE_MODEL: &str = "gpt-4";
const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";
const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-ada-002";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-sonnet-20240229";
const DEFAULT_GOOGLE_MODEL: &str = "gemini-pro";
const DEFAULT_GOOGLE_LOCATION: &str = "us-central1";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Settings for the resolved provider, one variant per [`ProviderIdentity`].
///
/// Optional fields are `None` when the matching key was not supplied; the
/// record does not check completeness.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "provider")]
pub enum ProviderSettings {
    #[serde(rename = "azure_openai")]
    AzureOpenAi(AzureOpenAiSettings),
    #[serde(rename = "openai")]
    OpenAi(OpenAiSettings),
    #[serde(rename = "anthropic")]
    Anthropic(AnthropicSettings),
    #[serde(rename = "google")]
    Google(GoogleSettings),
    #[serde(rename = "ollama")]
    Ollama(OllamaSettings),
}

impl ProviderSettings {
    /// The provider these settings belong to.
    pub fn provider(&self) -> ProviderIdentity {
        match self {
            ProviderSettings::AzureOpenAi(_) => ProviderIdentity::AzureOpenAi,
            ProviderSettings::OpenAi(_) => ProviderIdentity::OpenAi,
            ProviderSettings::Anthropic(_) => ProviderIdentity::Anthropic,
            ProviderSettings::Google(_) => ProviderIdentity::Google,
            ProviderSettings::Ollama(_) => ProviderIdentity::Ollama,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            ProviderSettings::AzureOpenAi(s) => &s.model,
            ProviderSettings::OpenAi(s) => &s.model,
            ProviderSettings::Anthropic(s) => &s.model,
            ProviderSettings::Google(s) => &s.model,
            ProviderSettings::Ollama(s) => &s.model,
        }
    }

    /// The API key, for providers that use one.
    pub fn api_key(&self) -> Option<&ApiKey> {
        match self {
            ProviderSettings::AzureOpenAi(s) => s.api_key.as_ref(),
            ProviderSettings::OpenAi(s) => s.api_key.as_ref(),
            ProviderSettings::Anthropic(s) => s.api_key.as_ref(),
            ProviderSettings::Google(s) => s.api_key.as_ref(),
            ProviderSettings::Ollama(_) => None,
        }
    }

    /// Build the settings record for `provider`.
    pub(crate) fn build(
        provider: ProviderIdentity,
        ns: &Namespace,
        config: &ConfigMapping,
        env: &EnvironmentView,
    ) -> Self {
        match provider {
            ProviderIdentity::AzureOpenAi => {
                ProviderSettings::AzureOpenAi(AzureOpenAiSettings::build(ns, config))
            }
            ProviderIdentity::OpenAi => ProviderSettings::OpenAi(OpenAiSettings::build(ns, config, env)),
            ProviderIdentity::Anthropic => {
                ProviderSettings::Anthropic(AnthropicSettings::build(ns, config, env))
            }
            ProviderIdentity::Google => ProviderSettings::Google(GoogleSettings::build(ns, config, env)),
            ProviderIdentity::Ollama => ProviderSettings::Ollama(OllamaSettings::build(ns, config)),
        }
    }
}

/// Azure OpenAI deployment settings.
#[derive(Debug, Clone, Serialize)]
pub struct AzureOpenAiSettings {
    pub model: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub api_base: Option<String>,
    pub api_key: Option<ApiKey>,
    pub api_version: String,
    pub deployment_name: Option<String>,
    pub embedding_deployment: String,
    pub embedding_model: String,
}

impl AzureOpenAiSettings {
    fn build(ns: &Namespace, config: &ConfigMapping) -> Self {
        let settings = Self {
            model: model_or(ns, config, DEFAULT_AZURE_MODEL),
            api_base: config.get_str(&ns.key("azure_endpoint")),
            api_key: config.get_str(&ns.key("azure_api_key")).map(ApiKey::from),
            api_version: config
                .get_str(&ns.key("model_version"))
                .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            deployment_name: config.get_str(&ns.key("azure_deployment")),
            embedding_deployment: config
                .get_str(&ns.key("azure_embedding_deployment"))
                .unwrap_or_else(|| DEFAULT_EMBEDDING_DEPLOYMENT.to_string()),
            embedding_model: config
                .get_str(&ns.key("azure_embedding_model"))
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        };

        tracing::info!(
            endpoint = ?settings.api_base,
            deployment = ?settings.deployment_name,
            api_version = %settings.api_version,
            model = %settings.model,
            "Azure OpenAI config"
        );
        settings
    }
}

/// OpenAI (or OpenAI-compatible endpoint) settings.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAiSettings {
    pub model: String,
    pub api_key: Option<ApiKey>,
    pub base_url: Option<String>,
}

impl OpenAiSettings {
    fn build(ns: &Namespace, config: &ConfigMapping, env: &EnvironmentView) -> Self {
        let settings = Self {
            model: model_or(ns, config, DEFAULT_OPENAI_MODEL),
            api_key: key_or_env(config, &ns.key("openai_api_key"), env, OPENAI_API_KEY_VAR),
            base_url: config.get_str(&ns.key("openai_base_url")),
        };

        tracing::info!(
            model = %settings.model,
            base_url = ?settings.base_url,
            "OpenAI config"
        );
        settings
    }
}

/// Anthropic Claude settings.
#[derive(Debug, Clone, Serialize)]
pub struct AnthropicSettings {
    pub model: String,
    pub api_key: Option<ApiKey>,
    pub base_url: Option<String>,
}

impl AnthropicSettings {
    fn build(ns: &Namespace, config: &ConfigMapping, env: &EnvironmentView) -> Self {
        let settings = Self {
            model: model_or(ns, config, DEFAULT_ANTHROPIC_MODEL),
            api_key: key_or_env(config, &ns.key("anthropic_api_key"), env, ANTHROPIC_API_KEY_VAR),
            base_url: config.get_str(&ns.key("anthropic_base_url")),
        };

        tracing::info!(
            model = %settings.model,
            base_url = ?settings.base_url,
            "Anthropic config"
        );
        settings
    }
}

/// Google Gemini settings.
#[derive(Debug, Clone, Serialize)]
pub struct GoogleSettings {
    pub model: String,
    pub api_key: Option<ApiKey>,
    pub project: Option<String>,
    pub location: String,
}

impl GoogleSettings {
    fn build(ns: &Namespace, config: &ConfigMapping, env: &EnvironmentView) -> Self {
        let settings = Self {
            model: model_or(ns, config, DEFAULT_GOOGLE_MODEL),
            api_key: key_or_env(config, &ns.key("google_api_key"), env, GOOGLE_API_KEY_VAR),
            project: config.get_str(&ns.key("google_project")),
            location: config
                .get_str(&ns.key("google_location"))
                .unwrap_or_else(|| DEFAULT_GOOGLE_LOCATION.to_string()),
        };

        tracing::info!(
            model = %settings.model,
            project = ?settings.project,
            location = %settings.location,
            "Google config"
        );
        settings
    }
}

/// Ollama settings.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaSettings {
    pub model: String,
    pub base_url: String,
}

impl OllamaSettings {
    fn build(ns: &Namespace, config: &ConfigMapping) -> Self {
        let settings = Self {
            model: model_or(ns, config, DEFAULT_OLLAMA_MODEL),
            base_url: config
                .get_str(&ns.key("ollama_base_url"))
                .unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
        };

        tracing::info!(
            base_url = %settings.base_url,
            model = %settings.model,
            "Ollama config"
        );
        settings
    }
}

/// The shared `<namespace>.model` key, or the provider default.
fn model_or(ns: &Namespace, config: &ConfigMapping, default: &str) -> String {
    config
        .get_str(&ns.key("model"))
        .unwrap_or_else(|| default.to_string())
}

/// API key from config, falling back to the environment when absent or empty.
fn key_or_env(
    config: &ConfigMapping,
    key: &str,
    env: &EnvironmentView,
    var: &str,
) -> Option<ApiKey> {
    config
        .get_non_empty(key)
        .map(ApiKey::from)
        .or_else(|| env.get(var).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns() -> Namespace {
        Namespace::new("langfuse")
    }

    #[test]
    fn test_azure_defaults() {
        let config = ConfigMapping::new().with("langfuse.azure_endpoint", "https://e");
        let settings = AzureOpenAiSettings::build(&ns(), &config);
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.api_base.as_deref(), Some("https://e"));
        assert!(settings.api_key.is_none());
        assert_eq!(settings.api_version, "2024-02-01");
        assert!(settings.deployment_name.is_none());
        assert_eq!(settings.embedding_deployment, "text-embedding-ada-002");
        assert_eq!(settings.embedding_model, "text-embedding-ada-002");
    }

    #[test]
    fn test_azure_full_mapping() {
        let config = ConfigMapping::new()
            .with("langfuse.azure_endpoint", "https://res.openai.azure.com")
            .with("langfuse.azure_api_key", "az-key")
            .with("langfuse.model_version", "2024-06-01")
            .with("langfuse.azure_deployment", "gpt4-prod")
            .with("langfuse.azure_embedding_deployment", "embed-prod")
            .with("langfuse.model", "gpt-4o");
        let settings = AzureOpenAiSettings::build(&ns(), &config);
        assert_eq!(settings.model, "gpt-4o");
        assert_eq!(settings.api_key.unwrap().expose_secret(), "az-key");
        assert_eq!(settings.api_version, "2024-06-01");
        assert_eq!(settings.deployment_name.as_deref(), Some("gpt4-prod"));
        assert_eq!(settings.embedding_deployment, "embed-prod");
        assert_eq!(settings.embedding_model, "text-embedding-ada-002");
    }

    #[test]
    fn test_config_key_wins_over_env() {
        let config = ConfigMapping::new().with("langfuse.openai_api_key", "from-config");
        let env = EnvironmentView::from_pairs([("OPENAI_API_KEY", "from-env")]);
        let settings = OpenAiSettings::build(&ns(), &config, &env);
        assert_eq!(settings.api_key.unwrap().expose_secret(), "from-config");
    }

    #[test]
    fn test_empty_config_key_falls_back_to_env() {
        let config = ConfigMapping::new().with("langfuse.anthropic_api_key", "");
        let env = EnvironmentView::from_pairs([("ANTHROPIC_API_KEY", "from-env")]);
        let settings = AnthropicSettings::build(&ns(), &config, &env);
        assert_eq!(settings.api_key.unwrap().expose_secret(), "from-env");
        assert_eq!(settings.model, "claude-3-sonnet-20240229");
    }

    #[test]
    fn test_google_defaults() {
        let config = ConfigMapping::new().with("langfuse.google_project", "proj-1");
        let settings = GoogleSettings::build(&ns(), &config, &EnvironmentView::empty());
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.project.as_deref(), Some("proj-1"));
        assert_eq!(settings.location, "us-central1");
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_ollama_null_base_url_uses_default() {
        let config = ConfigMapping::new().with("langfuse.ollama_base_url", serde_json::Value::Null);
        let settings = OllamaSettings::build(&ns(), &config);
        assert_eq!(settings.base_url, "http://localhost:11434");
        assert_eq!(settings.model, "llama3");
    }

    #[test]
    fn test_serialize_redacts_api_key() {
        let config = ConfigMapping::new().with("langfuse.openai_api_key", "sk-live-123");
        let settings = ProviderSettings::build(
            ProviderIdentity::OpenAi,
            &ns(),
            &config,
            &EnvironmentView::empty(),
        );
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["provider"], "openai");
        assert_eq!(json["api_key"], "[REDACTED]");
        assert_eq!(json["model"], "gpt-4");
    }

    #[test]
    fn test_provider_and_accessors() {
        let settings = ProviderSettings::build(
            ProviderIdentity::Ollama,
            &ns(),
            &ConfigMapping::new(),
            &EnvironmentView::empty(),
        );
        assert_eq!(settings.provider(), ProviderIdentity::Ollama);
        assert_eq!(settings.model(), "llama3");
        assert!(settings.api_key().is_none());
    }
}
