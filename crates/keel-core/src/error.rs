//! Error types for domain operations and workflow transitions.

/// Errors returned by principle operations and workflow event handling.
///
/// All of these are precondition failures raised before any persistence or
/// gateway side effect; the workflow state is unchanged when one is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The principle set is already at its maximum size.
    #[error("principle set is full ({0} max)")]
    PrincipleLimit(usize),
    /// A principle with this id already exists.
    #[error("duplicate principle id: {0}")]
    DuplicatePrinciple(String),
    /// No principle with this id exists.
    #[error("unknown principle id: {0}")]
    UnknownPrinciple(String),
    /// A principle title is empty.
    #[error("principle title is empty")]
    EmptyTitle,
    /// The situation description is empty.
    #[error("describe the situation first")]
    EmptySituation,
    /// No principles exist to rank against the situation.
    #[error("add at least one principle first")]
    NoPrinciples,
    /// A reflection is missing an answer.
    #[error("answer every reflection first")]
    UnansweredReflection,
    /// Referenced reflection index does not exist.
    #[error("unknown reflection index: {0}")]
    UnknownReflection(usize),
    /// No usable credential is configured.
    #[error("no API credential configured")]
    MissingCredential,
    /// The submitted credential is empty.
    #[error("credential is empty")]
    EmptyCredential,
    /// A gateway call is already outstanding.
    #[error("a request is already running")]
    Busy,
    /// Referenced history index does not exist.
    #[error("unknown history index: {0}")]
    UnknownRecord(usize),
}
