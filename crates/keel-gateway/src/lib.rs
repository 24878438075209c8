//! Gateway to the external LLM service.
//!
//! Two operations per decision: rank the user's principles against a
//! situation and generate one reflection question per matched principle,
//! then synthesize advice from the answered reflections. Plus a cheap
//! credential probe. The service is consumed as a black box speaking an
//! OpenAI-compatible chat-completions protocol.

pub mod error;
pub mod gateway;
pub mod prompt;
pub mod wire;

/// Gateway error type.
pub use error::GatewayError;
/// Gateway interface and HTTP implementation.
pub use gateway::{DecisionGateway, FALLBACK_ADVICE, HttpGateway};
