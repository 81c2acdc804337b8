//! Provider detection.
//!
//! Detection walks a fixed, ordered rule list and stops at the first rule
//! whose predicate holds. Order matters: an Azure-prefixed key wins over an
//! OpenAI key present in the same mapping.

use serde::Serialize;
use std::collections::BTreeMap;

use super::azure;
use super::identity::ProviderIdentity;
use super::params::{
    ConfigMapping, EnvironmentView, Namespace, ANTHROPIC_API_KEY_VAR, GOOGLE_API_KEY_VAR,
    OPENAI_API_KEY_VAR,
};
use super::settings::ProviderSettings;
use crate::config::{default_namespace, ResolverConfig};

/// Which detection rule selected the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    /// A key starts with `<ns>.azure_`
    AzurePrefix,
    /// `<ns>.openai_api_key` or `OPENAI_API_KEY`
    OpenAiKey,
    /// `<ns>.anthropic_api_key` or `ANTHROPIC_API_KEY`
    AnthropicKey,
    /// A key starts with `<ns>.google_`, or `GOOGLE_API_KEY`
    GooglePrefix,
    /// `<ns>.ollama_base_url` or any `<ns>.ollama_` key
    OllamaConfig,
    /// A non-empty Azure endpoint or deployment without a primary match
    AzureFallback,
    /// Nothing matched
    Default,
}

impl Signal {
    /// Whether this is a lower-confidence selection.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Signal::AzureFallback | Signal::Default)
    }
}

/// Outcome of detection: the provider and the rule that picked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub provider: ProviderIdentity,
    pub signal: Signal,
}

/// Detection plus the settings built for the detected provider.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub provider: ProviderIdentity,
    pub signal: Signal,
    pub settings: ProviderSettings,
}

/// Inputs visible to a detection rule.
struct Probe<'a> {
    ns: &'a Namespace,
    config: &'a ConfigMapping,
    env: &'a EnvironmentView,
}

/// One entry in the priority-ranked rule list.
struct Rule {
    provider: ProviderIdentity,
    signal: Signal,
    matches: fn(&Probe<'_>) -> bool,
}

/// Detection rules in priority order. The trailing default is applied
/// separately when none of these match.
const RULES: [Rule; 6] = [
    Rule {
        provider: ProviderIdentity::AzureOpenAi,
        signal: Signal::AzurePrefix,
        matches: azure_prefix,
    },
    Rule {
        provider: ProviderIdentity::OpenAi,
        signal: Signal::OpenAiKey,
        matches: openai_key,
    },
    Rule {
        provider: ProviderIdentity::Anthropic,
        signal: Signal::AnthropicKey,
        matches: anthropic_key,
    },
    Rule {
        provider: ProviderIdentity::Google,
        signal: Signal::GooglePrefix,
        matches: google_prefix,
    },
    Rule {
        provider: ProviderIdentity::Ollama,
        signal: Signal::OllamaConfig,
        matches: ollama_config,
    },
    Rule {
        provider: ProviderIdentity::AzureOpenAi,
        signal: Signal::AzureFallback,
        matches: azure_fallback,
    },
];

const DEFAULT_DETECTION: Detection = Detection {
    provider: ProviderIdentity::OpenAi,
    signal: Signal::Default,
};

fn azure_prefix(p: &Probe<'_>) -> bool {
    p.config.has_prefix(&p.ns.key("azure_"))
}

fn openai_key(p: &Probe<'_>) -> bool {
    p.config.contains_key(&p.ns.key("openai_api_key")) || p.env.is_set(OPENAI_API_KEY_VAR)
}

fn anthropic_key(p: &Probe<'_>) -> bool {
    p.config.contains_key(&p.ns.key("anthropic_api_key")) || p.env.is_set(ANTHROPIC_API_KEY_VAR)
}

fn google_prefix(p: &Probe<'_>) -> bool {
    p.config.has_prefix(&p.ns.key("google_")) || p.env.is_set(GOOGLE_API_KEY_VAR)
}

fn ollama_config(p: &Probe<'_>) -> bool {
    p.config.contains_key(&p.ns.key("ollama_base_url")) || p.config.has_prefix(&p.ns.key("ollama_"))
}

fn azure_fallback(p: &Probe<'_>) -> bool {
    p.config.get_non_empty(&p.ns.key("azure_endpoint")).is_some()
        || p.config.get_non_empty(&p.ns.key("azure_deployment")).is_some()
}

/// Resolves a provider and its settings from parameters and environment.
#[derive(Debug, Clone)]
pub struct Resolver {
    namespace: Namespace,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(default_namespace())
    }
}

impl Resolver {
    /// Create a resolver for keys under `namespace` (e.g. `"langfuse"`).
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Namespace::new(namespace),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.namespace.trim())
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_str()
    }

    /// Pick the provider. Never fails: falls back to OpenAI when nothing matches.
    pub fn detect(&self, config: &ConfigMapping, env: &EnvironmentView) -> Detection {
        let probe = self.probe(config, env);
        let detection = RULES
            .iter()
            .find(|rule| (rule.matches)(&probe))
            .map(|rule| Detection {
                provider: rule.provider,
                signal: rule.signal,
            })
            .unwrap_or(DEFAULT_DETECTION);

        match detection.signal {
            Signal::AzureFallback => {
                tracing::warn!("Falling back to Azure OpenAI configuration");
            }
            Signal::Default => {
                tracing::warn!("No specific LLM provider detected, defaulting to OpenAI");
            }
            signal => {
                tracing::debug!(
                    provider = %detection.provider,
                    signal = ?signal,
                    "Detected LLM provider"
                );
            }
        }

        detection
    }

    /// Every rule that matches, in priority order. The first entry is the one
    /// [`detect`](Self::detect) selects; later entries are shadowed.
    pub fn matching_signals(&self, config: &ConfigMapping, env: &EnvironmentView) -> Vec<Signal> {
        let probe = self.probe(config, env);
        RULES
            .iter()
            .filter(|rule| (rule.matches)(&probe))
            .map(|rule| rule.signal)
            .collect()
    }

    /// Detect the provider and build its settings.
    pub fn resolve(
        &self,
        config: &ConfigMapping,
        env: &EnvironmentView,
    ) -> (ProviderIdentity, ProviderSettings) {
        let resolution = self.resolve_detailed(config, env);
        (resolution.provider, resolution.settings)
    }

    /// Like [`resolve`](Self::resolve), also reporting which signal matched.
    pub fn resolve_detailed(&self, config: &ConfigMapping, env: &EnvironmentView) -> Resolution {
        let detection = self.detect(config, env);
        let settings = self.settings_for(detection.provider, config, env);
        Resolution {
            provider: detection.provider,
            signal: detection.signal,
            settings,
        }
    }

    /// Build settings for an explicitly chosen provider, skipping detection.
    pub fn settings_for(
        &self,
        provider: ProviderIdentity,
        config: &ConfigMapping,
        env: &EnvironmentView,
    ) -> ProviderSettings {
        ProviderSettings::build(provider, &self.namespace, config, env)
    }

    /// Fully qualified required Azure keys that are absent or empty.
    pub fn missing_azure_params(&self, config: &ConfigMapping) -> Vec<String> {
        azure::missing_required(&self.namespace, config)
    }

    /// Azure OpenAI environment variables derivable from the parameters.
    pub fn azure_env_vars(&self, config: &ConfigMapping) -> BTreeMap<&'static str, String> {
        azure::env_vars(&self.namespace, config)
    }

    fn probe<'a>(&'a self, config: &'a ConfigMapping, env: &'a EnvironmentView) -> Probe<'a> {
        Probe {
            ns: &self.namespace,
            config,
            env,
        }
    }
}

/// [`Resolver::detect`] with the default `langfuse` namespace.
pub fn detect(config: &ConfigMapping, env: &EnvironmentView) -> Detection {
    Resolver::default().detect(config, env)
}

/// [`Resolver::resolve`] with the default `langfuse` namespace.
pub fn resolve(config: &ConfigMapping, env: &EnvironmentView) -> (ProviderIdentity, ProviderSettings) {
    Resolver::default().resolve(config, env)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> EnvironmentView {
        EnvironmentView::empty()
    }

    #[test]
    fn test_rule_order_matches_priority() {
        let order: Vec<Signal> = RULES.iter().map(|r| r.signal).collect();
        assert_eq!(
            order,
            vec![
                Signal::AzurePrefix,
                Signal::OpenAiKey,
                Signal::AnthropicKey,
                Signal::GooglePrefix,
                Signal::OllamaConfig,
                Signal::AzureFallback,
            ]
        );
    }

    #[test]
    fn test_azure_beats_openai_key() {
        let config = ConfigMapping::new()
            .with("langfuse.azure_api_key", "a")
            .with("langfuse.openai_api_key", "o");
        let detection = detect(&config, &no_env());
        assert_eq!(detection.provider, ProviderIdentity::AzureOpenAi);
        assert_eq!(detection.signal, Signal::AzurePrefix);
    }

    #[test]
    fn test_openai_env_beats_anthropic_key() {
        let config = ConfigMapping::new().with("langfuse.anthropic_api_key", "a");
        let env = EnvironmentView::from_pairs([("OPENAI_API_KEY", "x")]);
        assert_eq!(detect(&config, &env).provider, ProviderIdentity::OpenAi);
    }

    #[test]
    fn test_anthropic_beats_google() {
        let config = ConfigMapping::new()
            .with("langfuse.anthropic_api_key", "a")
            .with("langfuse.google_project", "p");
        assert_eq!(detect(&config, &no_env()).provider, ProviderIdentity::Anthropic);
    }

    #[test]
    fn test_google_env_beats_ollama() {
        let config = ConfigMapping::new().with("langfuse.ollama_base_url", "http://h:1");
        let env = EnvironmentView::from_pairs([("GOOGLE_API_KEY", "g")]);
        assert_eq!(detect(&config, &env).provider, ProviderIdentity::Google);
    }

    #[test]
    fn test_ollama_any_prefixed_key() {
        let config = ConfigMapping::new().with("langfuse.ollama_keep_alive", "5m");
        let detection = detect(&config, &no_env());
        assert_eq!(detection.provider, ProviderIdentity::Ollama);
        assert_eq!(detection.signal, Signal::OllamaConfig);
    }

    #[test]
    fn test_default_is_openai_fallback() {
        let detection = detect(&ConfigMapping::new(), &no_env());
        assert_eq!(detection.provider, ProviderIdentity::OpenAi);
        assert_eq!(detection.signal, Signal::Default);
        assert!(detection.signal.is_fallback());
    }

    #[test]
    fn test_unrelated_keys_use_default() {
        let config = ConfigMapping::new()
            .with("langfuse.model", "gpt-4o")
            .with("other.azure_endpoint", "https://e");
        assert_eq!(detect(&config, &no_env()).signal, Signal::Default);
    }

    #[test]
    fn test_azure_fallback_predicate_requires_non_empty_value() {
        let ns = Namespace::new("langfuse");
        let env = no_env();

        let config = ConfigMapping::new().with("langfuse.azure_deployment", "gpt4");
        assert!(azure_fallback(&Probe { ns: &ns, config: &config, env: &env }));

        let config = ConfigMapping::new().with("langfuse.azure_endpoint", "");
        assert!(!azure_fallback(&Probe { ns: &ns, config: &config, env: &env }));
    }

    #[test]
    fn test_matching_signals_reports_shadowed_rules() {
        let config = ConfigMapping::new()
            .with("langfuse.azure_endpoint", "https://e")
            .with("langfuse.openai_api_key", "o");
        let signals = Resolver::default().matching_signals(&config, &no_env());
        assert_eq!(
            signals,
            vec![Signal::AzurePrefix, Signal::OpenAiKey, Signal::AzureFallback]
        );
    }

    #[test]
    fn test_custom_namespace() {
        let resolver = Resolver::new("evaluator");
        let config = ConfigMapping::new()
            .with("langfuse.azure_endpoint", "https://ignored")
            .with("evaluator.anthropic_api_key", "a");
        let (provider, settings) = resolver.resolve(&config, &no_env());
        assert_eq!(provider, ProviderIdentity::Anthropic);
        assert_eq!(settings.api_key().unwrap().expose_secret(), "a");
    }

    #[test]
    fn test_resolve_detailed_carries_signal() {
        let config = ConfigMapping::new().with("langfuse.google_location", "europe-west4");
        let resolution = Resolver::default().resolve_detailed(&config, &no_env());
        assert_eq!(resolution.provider, ProviderIdentity::Google);
        assert_eq!(resolution.signal, Signal::GooglePrefix);
        assert_eq!(resolution.settings.provider(), ProviderIdentity::Google);
    }

    #[test]
    fn test_settings_for_skips_detection() {
        let config = ConfigMapping::new().with("langfuse.azure_endpoint", "https://e");
        let settings = Resolver::default().settings_for(ProviderIdentity::Ollama, &config, &no_env());
        assert_eq!(settings.provider(), ProviderIdentity::Ollama);
    }
}
