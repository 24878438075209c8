//! Error types for gateway operations.

/// Errors returned by gateway operations.
///
/// Precondition variants are raised before any request goes out and are
/// distinct from remote failures. The `Analysis`/`Synthesis` variants carry
/// the single user-facing message for their operation; the underlying cause
/// is logged at the gateway boundary and does not propagate.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No usable credential was supplied.
    #[error("no API credential configured")]
    MissingCredential,
    /// The situation description is empty.
    #[error("situation description is empty")]
    EmptySituation,
    /// No principles were supplied to rank.
    #[error("no principles to rank")]
    NoPrinciples,
    /// More principles than the set bound were supplied.
    #[error("more than {0} principles supplied")]
    TooManyPrinciples(usize),
    /// The HTTP client could not be constructed.
    #[error("http client init failed: {0}")]
    Init(String),
    /// Relevance analysis failed; see the log for the cause.
    #[error("analysis failed")]
    Analysis,
    /// Advice synthesis failed; see the log for the cause.
    #[error("synthesis failed")]
    Synthesis,
}
