//! Parameter mapping and environment view consumed by the resolver.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::config::{ApiKey, ConfigError};

/// Environment variable consulted for an OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable consulted for an Anthropic API key.
pub const ANTHROPIC_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
/// Environment variable consulted for a Google API key.
pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// The only environment variables the resolver ever reads.
pub const KNOWN_ENV_VARS: [&str; 3] = [OPENAI_API_KEY_VAR, ANTHROPIC_API_KEY_VAR, GOOGLE_API_KEY_VAR];

/// Flat mapping of dotted configuration keys to scalar values.
///
/// A key counts as present for detection as soon as it exists, even with a
/// `null` value. Reading a value treats `null`, arrays and objects as absent
/// and renders strings, numbers and booleans as strings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ConfigMapping(HashMap<String, Value>);

impl ConfigMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object, e.g. `{"langfuse.model": "gpt-4o"}`.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(ConfigError::Params)
    }

    /// Load a flat JSON object from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::from_json_str(&content)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether the key exists at all.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether any key starts with `prefix`.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.0.keys().any(|k| k.starts_with(prefix))
    }

    /// Scalar value of `key` rendered as a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Like [`get_str`](Self::get_str), but an empty string also reads as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ConfigMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Read-only snapshot of the known provider API key variables.
///
/// Values are held as [`ApiKey`] so a `Debug` dump never prints them.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentView {
    vars: HashMap<&'static str, ApiKey>,
}

impl EnvironmentView {
    /// An empty view: no variable is set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot the known variables from the process environment.
    ///
    /// A variable holding non-UTF-8 bytes still counts as set; its value is
    /// kept lossily.
    pub fn from_process() -> Self {
        Self::from_lookup(process_var)
    }

    /// Snapshot the known variables through a custom lookup function.
    ///
    /// Keeps tests away from global env state.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = KNOWN_ENV_VARS
            .into_iter()
            .filter_map(|name| lookup(name).map(|value| (name, ApiKey::from(value))))
            .collect();
        Self { vars }
    }

    /// Build a view from explicit pairs. Names outside [`KNOWN_ENV_VARS`] are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut vars = HashMap::new();
        for (name, value) in pairs {
            match KNOWN_ENV_VARS.into_iter().find(|known| *known == name.as_ref()) {
                Some(known) => {
                    vars.insert(known, ApiKey::from(value.into()));
                }
                None => {
                    tracing::debug!(var = %name.as_ref(), "Ignoring unknown environment variable");
                }
            }
        }
        Self { vars }
    }

    /// Whether the variable is set, even to an empty string.
    pub fn is_set(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ApiKey> {
        self.vars.get(name)
    }
}

fn process_var(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Key namespace, e.g. `langfuse` in `langfuse.openai_api_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Namespace(String);

impl Namespace {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        Self(namespace.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    /// Fully qualified key: `<namespace>.<suffix>`.
    pub(crate) fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.0, suffix)
    }
}
