//! Error types for config loading and validation.

/// Errors returned while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading a config file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON5 parse error.
    #[error("parse error: {0}")]
    Parse(#[from] json5::Error),
    /// Schema mismatch while decoding the merged value.
    #[error("schema error: {0}")]
    Schema(#[from] serde_json::Error),
    /// Semantic validation failure.
    #[error("invalid config: {0}")]
    Invalid(String),
}
