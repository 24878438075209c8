//! Domain model and decision workflow for keel.

pub mod error;
pub mod model;
pub mod principles;
pub mod seed;
pub mod workflow;

/// Workflow and domain error type.
pub use error::WorkflowError;
/// Persisted domain records.
pub use model::{DecisionRecord, Principle, Reflection};
/// Bounded, uniquely-keyed principle collection.
pub use principles::{MAX_PRINCIPLES, PrincipleBook};
/// Default principle set used on first run.
pub use seed::seed_principles;
/// The decision workflow state machine.
pub use workflow::{CredentialStatus, Effect, Screen, Workflow, WorkflowEvent};
