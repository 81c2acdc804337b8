//! Azure OpenAI parameter checks and environment variable mapping.

use std::collections::BTreeMap;

use super::params::{ConfigMapping, Namespace};

/// Parameter suffixes an Azure deployment cannot work without.
pub const REQUIRED_AZURE_PARAMS: [&str; 3] = ["azure_api_key", "azure_endpoint", "azure_deployment"];

/// Parameter suffix -> environment variable understood by Azure OpenAI tooling.
pub const AZURE_ENV_MAPPINGS: [(&str, &str); 3] = [
    ("azure_api_key", "AZURE_OPENAI_API_KEY"),
    ("azure_endpoint", "AZURE_OPENAI_ENDPOINT"),
    ("model_version", "OPENAI_API_VERSION"),
];

/// Fully qualified required keys that are absent or empty.
pub(crate) fn missing_required(ns: &Namespace, config: &ConfigMapping) -> Vec<String> {
    let missing: Vec<String> = REQUIRED_AZURE_PARAMS
        .iter()
        .map(|suffix| ns.key(suffix))
        .filter(|key| config.get_non_empty(key).is_none())
        .collect();

    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "Missing required Azure parameters");
    }

    missing
}

/// Environment variables derivable from the parameters, without touching
/// the process environment.
pub(crate) fn env_vars(ns: &Namespace, config: &ConfigMapping) -> BTreeMap<&'static str, String> {
    let vars: BTreeMap<&'static str, String> = AZURE_ENV_MAPPINGS
        .iter()
        .filter_map(|(suffix, var)| config.get_str(&ns.key(suffix)).map(|value| (*var, value)))
        .collect();

    if !vars.is_empty() {
        tracing::info!(vars = ?vars.keys().collect::<Vec<_>>(), "Extracted Azure environment variables");
    }

    vars
}
