//! Configuration schema for keel.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root config for the keel application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KeelConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl KeelConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> KeelConfigBuilder {
        KeelConfigBuilder::new()
    }

    /// Validate configuration invariants that cannot be expressed in serde.
    pub fn validate(&self) -> Result<(), crate::ConfigError> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(crate::ConfigError::Invalid(
                "gateway.base_url must not be empty".to_string(),
            ));
        }
        if self.gateway.model.trim().is_empty() {
            return Err(crate::ConfigError::Invalid(
                "gateway.model must not be empty".to_string(),
            ));
        }
        if self.gateway.locale.trim().is_empty() {
            return Err(crate::ConfigError::Invalid(
                "gateway.locale must not be empty".to_string(),
            ));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(crate::ConfigError::Invalid(
                "gateway.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for assembling a `KeelConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct KeelConfigBuilder {
    config: KeelConfig,
}

impl KeelConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: KeelConfig::default(),
        }
    }

    /// Replace the gateway configuration.
    pub fn gateway(mut self, gateway: GatewayConfig) -> Self {
        self.config.gateway = gateway;
        self
    }

    /// Replace the storage configuration.
    pub fn storage(mut self, storage: StorageConfig) -> Self {
        self.config.storage = storage;
        self
    }

    /// Finalize and return the built `KeelConfig`.
    pub fn build(self) -> KeelConfig {
        self.config
    }
}

/// Connection settings for the LLM endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chat model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Language tag for generated questions and advice.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Hard timeout for a single gateway request.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            locale: default_locale(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Default API base URL.
fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Default chat model.
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// Default output language tag.
fn default_locale() -> String {
    "ko".to_string()
}

/// Default request timeout in seconds.
fn default_timeout_secs() -> u64 {
    45
}

/// Location of the on-disk store.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Explicit store directory; defaults to the platform data dir.
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolve the store root, falling back to the platform data directory.
    pub fn resolve_root(&self) -> PathBuf {
        if let Some(path) = self.path.as_ref() {
            return PathBuf::from(path);
        }
        ProjectDirs::from("", "", "keel")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".keel"))
    }
}
