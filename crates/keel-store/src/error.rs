//! Error types for store operations.

/// Errors returned by the fallible store methods.
///
/// The public `load_*`/`save_*` API swallows these fail-soft; they surface
/// only through the `try_*` variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
