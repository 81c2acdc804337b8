//! llm-resolver - Resolve LLM provider settings and build ready-to-use clients
//!
//! This library picks one LLM backend from loose key/value parameters and a
//! few well-known environment variables, normalizes that provider's settings,
//! and instantiates a client for it. It also carries the public-route
//! allow-list used to decide which paths require authentication.
//!
//! Each provider client is an in-crate adapter behind its own cargo feature
//! (`azure-openai`, `openai`, `anthropic`, `google`, `ollama`; all on by
//! default). Building without one makes instantiating that provider fail with
//! [`Error::MissingDependency`]. That dispatch path only compiles with a
//! feature switched off, so run the unit tests a second time as
//! `cargo test --lib --no-default-features --features openai`.

#[cfg(not(any(
    feature = "azure-openai",
    feature = "openai",
    feature = "anthropic",
    feature = "google",
    feature = "ollama"
)))]
compile_error!("llm-resolver needs at least one provider feature enabled");

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod provider;

pub use client::{instantiate, instantiate_named, LlmClient};
pub use config::Config;
pub use error::{Error, Result};
pub use provider::{resolve, ProviderIdentity, ProviderSettings, Resolver};
