//! Error types for llm-resolver.

use crate::provider::ProviderIdentity;

/// Result type alias for llm-resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for llm-resolver.
///
/// Resolution itself never fails; every variant here comes from parsing a
/// provider name, loading configuration, or building and using a client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Unsupported provider type: {name}")]
    UnsupportedProvider { name: String },

    #[error(
        "Missing dependency for {provider}. Install the required package: \
         rebuild llm-resolver with the '{feature}' feature enabled"
    )]
    MissingDependency {
        provider: ProviderIdentity,
        feature: &'static str,
    },

    #[error("Settings for provider '{found}' cannot build a '{expected}' client")]
    ProviderMismatch {
        expected: ProviderIdentity,
        found: ProviderIdentity,
    },

    #[error("Invalid settings for provider '{provider}': {message}")]
    InvalidSettings {
        provider: ProviderIdentity,
        message: String,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),
}
