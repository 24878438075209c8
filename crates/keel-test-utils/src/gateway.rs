use async_trait::async_trait;
use keel_core::{Principle, Reflection};
use keel_gateway::{DecisionGateway, GatewayError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Validate(String),
    Analyze {
        situation: String,
        principle_ids: Vec<String>,
    },
    Synthesize {
        situation: String,
        answers: usize,
    },
}

/// Gateway double with queued outcomes and recorded calls.
///
/// Each analysis/synthesis call pops the next queued outcome; an empty queue
/// yields the operation's failure. Credential validation succeeds for the
/// configured secret only.
pub struct ScriptedGateway {
    analyses: Mutex<VecDeque<Result<Vec<Reflection>, GatewayError>>>,
    syntheses: Mutex<VecDeque<Result<String, GatewayError>>>,
    accepted_credential: Option<String>,
    pub calls: Arc<Mutex<Vec<GatewayCall>>>,
}

impl ScriptedGateway {
    /// Create a gateway that accepts the given credential on validation.
    pub fn new(accepted_credential: impl Into<String>) -> Self {
        Self {
            analyses: Mutex::new(VecDeque::new()),
            syntheses: Mutex::new(VecDeque::new()),
            accepted_credential: Some(accepted_credential.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a gateway that rejects every credential.
    pub fn rejecting() -> Self {
        Self {
            analyses: Mutex::new(VecDeque::new()),
            syntheses: Mutex::new(VecDeque::new()),
            accepted_credential: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue an analysis outcome.
    pub fn push_analysis(&self, outcome: Result<Vec<Reflection>, GatewayError>) {
        self.analyses.lock().push_back(outcome);
    }

    /// Queue a synthesis outcome.
    pub fn push_synthesis(&self, outcome: Result<String, GatewayError>) {
        self.syntheses.lock().push_back(outcome);
    }

    /// All calls recorded so far.
    pub fn recorded(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DecisionGateway for ScriptedGateway {
    async fn validate_credential(&self, candidate: &str) -> bool {
        self.calls
            .lock()
            .push(GatewayCall::Validate(candidate.to_string()));
        self.accepted_credential.as_deref() == Some(candidate)
    }

    async fn analyze_situation(
        &self,
        _credential: &str,
        situation: &str,
        principles: &[Principle],
    ) -> Result<Vec<Reflection>, GatewayError> {
        self.calls.lock().push(GatewayCall::Analyze {
            situation: situation.to_string(),
            principle_ids: principles
                .iter()
                .map(|principle| principle.id.clone())
                .collect(),
        });
        self.analyses
            .lock()
            .pop_front()
            .unwrap_or(Err(GatewayError::Analysis))
    }

    async fn synthesize_advice(
        &self,
        _credential: &str,
        situation: &str,
        reflections: &[Reflection],
    ) -> Result<String, GatewayError> {
        self.calls.lock().push(GatewayCall::Synthesize {
            situation: situation.to_string(),
            answers: reflections
                .iter()
                .filter(|reflection| reflection.is_answered())
                .count(),
        });
        self.syntheses
            .lock()
            .pop_front()
            .unwrap_or(Err(GatewayError::Synthesis))
    }
}

/// Gateway double that fails every operation.
#[derive(Debug, Default)]
pub struct FailingGateway;

impl FailingGateway {
    /// Create a failing gateway.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DecisionGateway for FailingGateway {
    async fn validate_credential(&self, _candidate: &str) -> bool {
        false
    }

    async fn analyze_situation(
        &self,
        _credential: &str,
        _situation: &str,
        _principles: &[Principle],
    ) -> Result<Vec<Reflection>, GatewayError> {
        Err(GatewayError::Analysis)
    }

    async fn synthesize_advice(
        &self,
        _credential: &str,
        _situation: &str,
        _reflections: &[Reflection],
    ) -> Result<String, GatewayError> {
        Err(GatewayError::Synthesis)
    }
}
