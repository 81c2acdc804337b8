//! Provider detection and settings construction.
//!
//! This module turns a flat parameter mapping (plus a few well-known
//! environment variables) into exactly one provider and its settings:
//! - Ordered detection rules, first match wins
//! - Per-provider settings with documented defaults
//! - Azure helpers for required-parameter checks and env var mapping

mod azure;
mod identity;
mod params;
mod resolver;
mod settings;

pub use azure::{AZURE_ENV_MAPPINGS, REQUIRED_AZURE_PARAMS};
pub use identity::ProviderIdentity;
pub use params::{
    ConfigMapping, EnvironmentView, ANTHROPIC_API_KEY_VAR, GOOGLE_API_KEY_VAR, KNOWN_ENV_VARS,
    OPENAI_API_KEY_VAR,
};
pub use resolver::{detect, resolve, Detection, Resolution, Resolver, Signal};
pub use settings::{
    AnthropicSettings, AzureOpenAiSettings, GoogleSettings, OllamaSettings, OpenAiSettings,
    ProviderSettings,
};
