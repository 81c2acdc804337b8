//! Configuration parsing and validation for llm-resolver.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Key namespace shared by all provider parameters (e.g. "langfuse")
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

pub(crate) fn default_namespace() -> String {
    "langfuse".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
        }
    }
}

/// Route authentication configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Extra paths exempt from authentication, on top of the built-in set
    #[serde(default)]
    pub public_routes: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const REDACTED: &str = "[REDACTED]";

/// Provider credential.
///
/// `Debug`, `Display` and `Serialize` all print a placeholder, so resolved
/// settings can be logged or dumped as JSON. Read the value with
/// [`ApiKey::expose_secret`] at the point it goes on the wire.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ApiKey::new)
    }
}

impl From<String> for ApiKey {
    fn from(value: String) -> Self {
        ApiKey::new(value)
    }
}

impl From<&str> for ApiKey {
    fn from(value: &str) -> Self {
        ApiKey::new(value)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let namespace = self.resolver.namespace.trim();
        if namespace.is_empty() {
            return Err(ConfigError::Validation(
                "Resolver namespace must not be empty".to_string(),
            ));
        }
        if namespace.ends_with('.') {
            return Err(ConfigError::Validation(format!(
                "Resolver namespace '{}' must not end with '.'",
                namespace
            )));
        }

        for route in &self.auth.public_routes {
            if !route.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "Public route '{}' must start with '/'",
                    route
                )));
            }
        }

        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse parameters: {0}")]
    Params(#[from] serde_json::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}
