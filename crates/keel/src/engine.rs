//! Engine wiring the workflow to the store and the gateway.
//!
//! The engine runs on the frontend's thread: [`Engine::dispatch`] advances
//! the workflow and carries out persistence effects inline (fail-soft, per
//! the store contract), while gateway work comes back as [`Command`] values
//! the frontend runs asynchronously, feeding the completion event into the
//! next `dispatch`. That split keeps the UI loop free while a call is in
//! flight and keeps the whole flow drivable from tests.

use keel_core::{Effect, Principle, Reflection, Workflow, WorkflowError, WorkflowEvent};
use keel_gateway::DecisionGateway;
use keel_store::FileStore;
use log::info;
use std::sync::Arc;

/// Asynchronous work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the relevance analysis gateway call.
    Analyze {
        credential: String,
        situation: String,
        principles: Vec<Principle>,
    },
    /// Run the advice synthesis gateway call.
    Synthesize {
        credential: String,
        situation: String,
        reflections: Vec<Reflection>,
    },
    /// Probe a candidate credential.
    ValidateCredential(String),
    /// Collect a credential from the user (view concern, no gateway call).
    PromptCredential,
}

/// Application engine: workflow state plus its store and gateway.
pub struct Engine {
    workflow: Workflow,
    store: FileStore,
    gateway: Arc<dyn DecisionGateway>,
    credential: Option<String>,
}

impl Engine {
    /// Load persisted state and build the initial workflow.
    pub fn bootstrap(store: FileStore, gateway: Arc<dyn DecisionGateway>) -> Self {
        let principles = store.load_principles();
        let history = store.load_decisions();
        let credential = store.load_credential();
        info!(
            "engine bootstrapped (first_run={}, history={}, credential_present={})",
            principles.is_none(),
            history.len(),
            credential.is_some()
        );
        let workflow = Workflow::bootstrap(principles, history, credential.is_some());
        Self {
            workflow,
            store,
            gateway,
            credential,
        }
    }

    /// Current workflow state.
    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    /// Take the last surfaced error message, clearing it.
    pub fn take_error(&mut self) -> Option<String> {
        self.workflow.take_error()
    }

    /// Gateway handle for running commands off-thread.
    pub fn gateway(&self) -> Arc<dyn DecisionGateway> {
        self.gateway.clone()
    }

    /// Apply an event: run persistence effects inline, return gateway work.
    pub fn dispatch(&mut self, event: WorkflowEvent) -> Result<Vec<Command>, WorkflowError> {
        let effects = self.workflow.handle(event)?;
        let mut commands = Vec::new();
        for effect in effects {
            match effect {
                Effect::PersistPrinciples => {
                    self.store
                        .save_principles(self.workflow.principles().as_slice());
                }
                Effect::PersistDecisions => {
                    self.store.save_decisions(self.workflow.history());
                }
                Effect::PersistCredential(secret) => {
                    self.store.save_credential(&secret);
                    self.credential = Some(secret);
                }
                Effect::Analyze {
                    situation,
                    principles,
                } => {
                    commands.push(Command::Analyze {
                        credential: self.credential.clone().unwrap_or_default(),
                        situation,
                        principles,
                    });
                }
                Effect::Synthesize {
                    situation,
                    reflections,
                } => {
                    commands.push(Command::Synthesize {
                        credential: self.credential.clone().unwrap_or_default(),
                        situation,
                        reflections,
                    });
                }
                Effect::ValidateCredential(secret) => {
                    commands.push(Command::ValidateCredential(secret));
                }
                Effect::PromptCredential => {
                    commands.push(Command::PromptCredential);
                }
            }
        }
        Ok(commands)
    }

    /// Run a gateway command to completion, returning the follow-up event.
    ///
    /// `Command::PromptCredential` is a view concern and yields no event.
    pub async fn run(
        gateway: Arc<dyn DecisionGateway>,
        command: Command,
    ) -> Option<WorkflowEvent> {
        match command {
            Command::Analyze {
                credential,
                situation,
                principles,
            } => Some(
                match gateway
                    .analyze_situation(&credential, &situation, &principles)
                    .await
                {
                    Ok(reflections) => WorkflowEvent::AnalysisCompleted(reflections),
                    Err(err) => WorkflowEvent::AnalysisFailed(err.to_string()),
                },
            ),
            Command::Synthesize {
                credential,
                situation,
                reflections,
            } => Some(
                match gateway
                    .synthesize_advice(&credential, &situation, &reflections)
                    .await
                {
                    Ok(advice) => WorkflowEvent::SynthesisCompleted(advice),
                    Err(err) => WorkflowEvent::SynthesisFailed(err.to_string()),
                },
            ),
            Command::ValidateCredential(secret) => {
                let valid = gateway.validate_credential(&secret).await;
                Some(WorkflowEvent::CredentialValidated {
                    secret,
                    valid,
                })
            }
            Command::PromptCredential => None,
        }
    }
}
