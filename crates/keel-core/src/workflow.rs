//! Decision workflow state machine.
//!
//! The workflow owns the application state and advances it through
//! [`Workflow::handle`]: each event mutates the state and returns the side
//! effects (persistence, gateway calls) the caller must carry out. No I/O or
//! rendering happens here, which keeps every transition testable on its own.

use crate::error::WorkflowError;
use crate::model::{DecisionRecord, Principle, Reflection};
use crate::principles::PrincipleBook;
use log::{debug, info, warn};

/// Active screen in the decision flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// First-run principle setup.
    Onboarding,
    /// Home screen.
    Dashboard,
    /// Principle add/edit/delete manager.
    Principles,
    /// Situation description input.
    Situation,
    /// Reflection question answering.
    Reflection,
    /// Synthesized advice for the just-archived decision.
    Advice,
    /// Decision history list.
    History,
    /// Single decision record, by history index.
    HistoryDetail(usize),
}

/// Validation state of the stored API credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialStatus {
    /// No credential entered yet.
    #[default]
    Missing,
    /// A probe request is outstanding.
    Testing,
    /// The credential passed its probe (or was loaded from the store).
    Valid,
    /// The credential failed its probe; the user must resubmit.
    Invalid,
}

/// Events fed into the workflow by the view layer or by completed
/// gateway calls.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    /// Onboarding finished with the (possibly edited) starter set.
    FinishOnboarding(Vec<Principle>),
    /// Open the principle manager.
    OpenPrinciples,
    /// Commit edited principles from the manager.
    SavePrinciples(Vec<Principle>),
    /// Leave the principle manager, discarding uncommitted edits.
    ClosePrinciples,
    /// Begin a new decision from the dashboard.
    StartDecision,
    /// Submit the situation description for analysis.
    SubmitSituation(String),
    /// Analysis finished with the matched reflections.
    AnalysisCompleted(Vec<Reflection>),
    /// Analysis failed with a user-facing message.
    AnalysisFailed(String),
    /// Record the answer for one reflection.
    AnswerReflection { index: usize, answer: String },
    /// Submit all answers for synthesis.
    SubmitReflections,
    /// Synthesis finished with the advice text.
    SynthesisCompleted(String),
    /// Synthesis failed with a user-facing message.
    SynthesisFailed(String),
    /// Leave the advice screen.
    AcknowledgeAdvice,
    /// Abandon the in-progress decision.
    CancelDecision,
    /// Open the history list.
    OpenHistory,
    /// Open one record from the history list.
    OpenHistoryDetail(usize),
    /// Back from a record to the list.
    CloseHistoryDetail,
    /// Back from the list to the dashboard.
    CloseHistory,
    /// Delete the record currently shown in detail.
    DeleteRecord,
    /// A credential was entered in the credential overlay.
    CredentialSubmitted(String),
    /// The credential probe finished.
    CredentialValidated { secret: String, valid: bool },
}

/// Side effects requested by a transition, to be carried out by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist the current principle set.
    PersistPrinciples,
    /// Persist the current decision history.
    PersistDecisions,
    /// Persist a freshly validated credential.
    PersistCredential(String),
    /// Run the relevance analysis gateway call.
    Analyze {
        situation: String,
        principles: Vec<Principle>,
    },
    /// Run the advice synthesis gateway call.
    Synthesize {
        situation: String,
        reflections: Vec<Reflection>,
    },
    /// Probe a candidate credential against the gateway.
    ValidateCredential(String),
    /// Ask the view to collect a credential from the user.
    PromptCredential,
}

/// In-progress decision being assembled across screens.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    /// The dilemma as the user described it.
    pub situation: String,
    /// Reflections returned by analysis, answered in place.
    pub reflections: Vec<Reflection>,
}

/// Application state plus the transition rules between screens.
#[derive(Debug, Clone)]
pub struct Workflow {
    screen: Screen,
    principles: PrincipleBook,
    history: Vec<DecisionRecord>,
    credential: CredentialStatus,
    draft: Option<Draft>,
    busy: bool,
    last_error: Option<String>,
}

impl Workflow {
    /// Build the initial state from persisted data.
    ///
    /// No persisted principle set means first run: the machine starts in
    /// Onboarding with the seed set staged for editing. Otherwise it starts
    /// on the dashboard with the stored set.
    pub fn bootstrap(
        principles: Option<Vec<Principle>>,
        history: Vec<DecisionRecord>,
        credential_present: bool,
    ) -> Self {
        let (screen, book) = match principles {
            Some(list) => match PrincipleBook::new(list) {
                Ok(book) => (Screen::Dashboard, book),
                Err(err) => {
                    // A corrupt stored set degrades to a fresh start rather
                    // than blocking startup.
                    warn!("stored principles rejected, reseeding (reason={err})");
                    (Screen::Onboarding, PrincipleBook::seeded())
                }
            },
            None => (Screen::Onboarding, PrincipleBook::seeded()),
        };
        info!(
            "workflow bootstrapped (screen={screen:?}, principles={}, history={}, credential_present={credential_present})",
            book.len(),
            history.len()
        );
        Self {
            screen,
            principles: book,
            history,
            credential: if credential_present {
                CredentialStatus::Valid
            } else {
                CredentialStatus::Missing
            },
            draft: None,
            busy: false,
            last_error: None,
        }
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Current principle set.
    pub fn principles(&self) -> &PrincipleBook {
        &self.principles
    }

    /// Decision history, most recent first.
    pub fn history(&self) -> &[DecisionRecord] {
        &self.history
    }

    /// Credential validation status.
    pub fn credential(&self) -> CredentialStatus {
        self.credential
    }

    /// In-progress decision, if any.
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    /// Whether a gateway call is outstanding.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Take the last surfaced error message, clearing it.
    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Apply an event, returning the side effects the caller must run.
    ///
    /// Precondition failures leave the state untouched. Completion events
    /// arriving for a screen the user already left are dropped with a log.
    pub fn handle(&mut self, event: WorkflowEvent) -> Result<Vec<Effect>, WorkflowError> {
        match event {
            WorkflowEvent::FinishOnboarding(list) => self.finish_onboarding(list),
            WorkflowEvent::OpenPrinciples => self.navigate(Screen::Dashboard, Screen::Principles),
            WorkflowEvent::SavePrinciples(list) => self.save_principles(list),
            WorkflowEvent::ClosePrinciples => self.navigate(Screen::Principles, Screen::Dashboard),
            WorkflowEvent::StartDecision => self.start_decision(),
            WorkflowEvent::SubmitSituation(text) => self.submit_situation(text),
            WorkflowEvent::AnalysisCompleted(reflections) => self.analysis_completed(reflections),
            WorkflowEvent::AnalysisFailed(message) => self.analysis_failed(message),
            WorkflowEvent::AnswerReflection { index, answer } => self.answer(index, answer),
            WorkflowEvent::SubmitReflections => self.submit_reflections(),
            WorkflowEvent::SynthesisCompleted(advice) => self.synthesis_completed(advice),
            WorkflowEvent::SynthesisFailed(message) => self.synthesis_failed(message),
            WorkflowEvent::AcknowledgeAdvice => self.navigate(Screen::Advice, Screen::Dashboard),
            WorkflowEvent::CancelDecision => self.cancel_decision(),
            WorkflowEvent::OpenHistory => self.navigate(Screen::Dashboard, Screen::History),
            WorkflowEvent::OpenHistoryDetail(index) => self.open_history_detail(index),
            WorkflowEvent::CloseHistoryDetail => {
                if let Screen::HistoryDetail(_) = self.screen {
                    self.screen = Screen::History;
                }
                Ok(Vec::new())
            }
            WorkflowEvent::CloseHistory => self.navigate(Screen::History, Screen::Dashboard),
            WorkflowEvent::DeleteRecord => self.delete_record(),
            WorkflowEvent::CredentialSubmitted(secret) => self.credential_submitted(secret),
            WorkflowEvent::CredentialValidated { secret, valid } => {
                self.credential_validated(secret, valid)
            }
        }
    }

    /// Unconditional navigation between two stable screens.
    fn navigate(&mut self, from: Screen, to: Screen) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != from {
            debug!("ignoring navigation (from={from:?}, to={to:?}, screen={:?})", self.screen);
            return Ok(Vec::new());
        }
        if to == Screen::Dashboard {
            self.draft = None;
        }
        self.screen = to;
        Ok(Vec::new())
    }

    fn finish_onboarding(&mut self, list: Vec<Principle>) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Onboarding {
            return Ok(Vec::new());
        }
        self.principles.replace_all(list)?;
        self.screen = Screen::Dashboard;
        info!("onboarding finished (principles={})", self.principles.len());
        Ok(vec![Effect::PersistPrinciples])
    }

    fn save_principles(&mut self, list: Vec<Principle>) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Principles {
            return Ok(Vec::new());
        }
        self.principles.replace_all(list)?;
        info!("principles saved (count={})", self.principles.len());
        Ok(vec![Effect::PersistPrinciples])
    }

    fn start_decision(&mut self) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Dashboard {
            return Ok(Vec::new());
        }
        if self.credential != CredentialStatus::Valid {
            debug!("decision blocked, no credential (status={:?})", self.credential);
            return Ok(vec![Effect::PromptCredential]);
        }
        self.draft = Some(Draft::default());
        self.screen = Screen::Situation;
        Ok(Vec::new())
    }

    fn submit_situation(&mut self, text: String) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Situation {
            return Ok(Vec::new());
        }
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        if text.trim().is_empty() {
            return Err(WorkflowError::EmptySituation);
        }
        if self.credential != CredentialStatus::Valid {
            return Err(WorkflowError::MissingCredential);
        }
        if self.principles.is_empty() {
            return Err(WorkflowError::NoPrinciples);
        }
        let draft = self.draft.get_or_insert_with(Draft::default);
        draft.situation = text.trim().to_string();
        self.busy = true;
        info!("analysis requested (situation_len={})", draft.situation.len());
        Ok(vec![Effect::Analyze {
            situation: draft.situation.clone(),
            principles: self.principles.as_slice().to_vec(),
        }])
    }

    fn analysis_completed(
        &mut self,
        reflections: Vec<Reflection>,
    ) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Situation {
            debug!("dropping stale analysis result (screen={:?})", self.screen);
            return Ok(Vec::new());
        }
        self.busy = false;
        self.last_error = None;
        // Zero matched principles is a valid, if degenerate, outcome; the
        // reflection screen shows the empty state instead of blocking.
        info!("analysis completed (reflections={})", reflections.len());
        if let Some(draft) = self.draft.as_mut() {
            draft.reflections = reflections;
        }
        self.screen = Screen::Reflection;
        Ok(Vec::new())
    }

    fn analysis_failed(&mut self, message: String) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Situation {
            debug!("dropping stale analysis failure (screen={:?})", self.screen);
            return Ok(Vec::new());
        }
        self.busy = false;
        warn!("analysis failed (message={message})");
        self.last_error = Some(message);
        Ok(Vec::new())
    }

    fn answer(&mut self, index: usize, answer: String) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Reflection {
            return Ok(Vec::new());
        }
        let draft = self.draft.as_mut().ok_or(WorkflowError::UnknownReflection(index))?;
        let reflection = draft
            .reflections
            .get_mut(index)
            .ok_or(WorkflowError::UnknownReflection(index))?;
        reflection.answer = Some(answer);
        Ok(Vec::new())
    }

    fn submit_reflections(&mut self) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Reflection {
            return Ok(Vec::new());
        }
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        let draft = self.draft.as_ref().ok_or(WorkflowError::UnansweredReflection)?;
        if draft.reflections.iter().any(|reflection| !reflection.is_answered()) {
            return Err(WorkflowError::UnansweredReflection);
        }
        self.busy = true;
        info!(
            "synthesis requested (reflections={})",
            draft.reflections.len()
        );
        Ok(vec![Effect::Synthesize {
            situation: draft.situation.clone(),
            reflections: draft.reflections.clone(),
        }])
    }

    fn synthesis_completed(&mut self, advice: String) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Reflection {
            debug!("dropping stale synthesis result (screen={:?})", self.screen);
            return Ok(Vec::new());
        }
        self.busy = false;
        let draft = self.draft.take().ok_or(WorkflowError::UnansweredReflection)?;
        let record = match DecisionRecord::new(draft.situation, draft.reflections, advice) {
            Ok(record) => record,
            Err(err) => {
                // Answers cannot change while a call is outstanding, so this
                // only trips if the caller bypassed submit_reflections.
                warn!("refusing to archive incomplete decision (reason={err})");
                self.draft = None;
                return Err(err);
            }
        };
        info!("decision archived (record_id={})", record.id);
        self.history.insert(0, record);
        self.last_error = None;
        self.screen = Screen::Advice;
        Ok(vec![Effect::PersistDecisions])
    }

    fn synthesis_failed(&mut self, message: String) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::Reflection {
            debug!("dropping stale synthesis failure (screen={:?})", self.screen);
            return Ok(Vec::new());
        }
        self.busy = false;
        warn!("synthesis failed (message={message})");
        self.last_error = Some(message);
        Ok(Vec::new())
    }

    fn cancel_decision(&mut self) -> Result<Vec<Effect>, WorkflowError> {
        if !matches!(self.screen, Screen::Situation | Screen::Reflection) {
            return Ok(Vec::new());
        }
        if self.busy {
            return Err(WorkflowError::Busy);
        }
        self.draft = None;
        self.screen = Screen::Dashboard;
        Ok(Vec::new())
    }

    fn open_history_detail(&mut self, index: usize) -> Result<Vec<Effect>, WorkflowError> {
        if self.screen != Screen::History {
            return Ok(Vec::new());
        }
        if index >= self.history.len() {
            return Err(WorkflowError::UnknownRecord(index));
        }
        self.screen = Screen::HistoryDetail(index);
        Ok(Vec::new())
    }

    fn delete_record(&mut self) -> Result<Vec<Effect>, WorkflowError> {
        let Screen::HistoryDetail(index) = self.screen else {
            return Ok(Vec::new());
        };
        if index >= self.history.len() {
            return Err(WorkflowError::UnknownRecord(index));
        }
        let record = self.history.remove(index);
        info!("decision deleted (record_id={})", record.id);
        self.screen = Screen::History;
        Ok(vec![Effect::PersistDecisions])
    }

    fn credential_submitted(&mut self, secret: String) -> Result<Vec<Effect>, WorkflowError> {
        if secret.trim().is_empty() {
            return Err(WorkflowError::EmptyCredential);
        }
        self.credential = CredentialStatus::Testing;
        Ok(vec![Effect::ValidateCredential(secret)])
    }

    fn credential_validated(
        &mut self,
        secret: String,
        valid: bool,
    ) -> Result<Vec<Effect>, WorkflowError> {
        if valid {
            info!("credential accepted");
            self.credential = CredentialStatus::Valid;
            Ok(vec![Effect::PersistCredential(secret)])
        } else {
            warn!("credential rejected by probe");
            self.credential = CredentialStatus::Invalid;
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialStatus, Effect, Screen, Workflow, WorkflowEvent};
    use crate::error::WorkflowError;
    use crate::model::{Principle, Reflection};
    use pretty_assertions::assert_eq;

    fn ready_workflow() -> Workflow {
        Workflow::bootstrap(Some(vec![Principle::new("Courage", "act")]), Vec::new(), true)
    }

    fn reflections_for(workflow: &Workflow, count: usize) -> Vec<Reflection> {
        let principle = &workflow.principles().as_slice()[0];
        (0..count)
            .map(|index| Reflection::from_principle(principle, format!("q{index}")))
            .collect()
    }

    #[test]
    fn first_run_starts_in_onboarding_with_seeds() {
        let workflow = Workflow::bootstrap(None, Vec::new(), false);
        assert_eq!(workflow.screen(), Screen::Onboarding);
        assert_eq!(workflow.principles().len(), 5);
        assert_eq!(workflow.credential(), CredentialStatus::Missing);
    }

    #[test]
    fn persisted_principles_skip_onboarding() {
        let workflow =
            Workflow::bootstrap(Some(vec![Principle::new("Courage", "act")]), Vec::new(), false);
        assert_eq!(workflow.screen(), Screen::Dashboard);
        assert_eq!(workflow.principles().len(), 1);
    }

    #[test]
    fn start_decision_without_credential_prompts() {
        let mut workflow =
            Workflow::bootstrap(Some(vec![Principle::new("Courage", "act")]), Vec::new(), false);
        let effects = workflow.handle(WorkflowEvent::StartDecision).expect("handle");
        assert_eq!(effects, vec![Effect::PromptCredential]);
        assert_eq!(workflow.screen(), Screen::Dashboard);
    }

    #[test]
    fn situation_submission_requires_text() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        let result = workflow.handle(WorkflowEvent::SubmitSituation("  ".to_string()));
        assert_eq!(result, Err(WorkflowError::EmptySituation));
        assert_eq!(workflow.screen(), Screen::Situation);
        assert!(!workflow.busy());
    }

    #[test]
    fn analysis_round_trip_reaches_reflection() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        let effects = workflow
            .handle(WorkflowEvent::SubmitSituation("take the offer?".to_string()))
            .expect("submit");
        assert!(matches!(effects[0], Effect::Analyze { .. }));
        assert!(workflow.busy());

        // Re-submission while the call is outstanding is rejected.
        let result = workflow.handle(WorkflowEvent::SubmitSituation("again".to_string()));
        assert_eq!(result, Err(WorkflowError::Busy));

        let reflections = reflections_for(&workflow, 2);
        workflow
            .handle(WorkflowEvent::AnalysisCompleted(reflections))
            .expect("completed");
        assert_eq!(workflow.screen(), Screen::Reflection);
        assert!(!workflow.busy());
        assert_eq!(workflow.draft().expect("draft").reflections.len(), 2);
    }

    #[test]
    fn empty_analysis_still_transitions() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        workflow
            .handle(WorkflowEvent::SubmitSituation("dilemma".to_string()))
            .expect("submit");
        workflow
            .handle(WorkflowEvent::AnalysisCompleted(Vec::new()))
            .expect("completed");
        assert_eq!(workflow.screen(), Screen::Reflection);
        assert!(workflow.draft().expect("draft").reflections.is_empty());
    }

    #[test]
    fn analysis_failure_stays_on_situation() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        workflow
            .handle(WorkflowEvent::SubmitSituation("dilemma".to_string()))
            .expect("submit");
        workflow
            .handle(WorkflowEvent::AnalysisFailed("analysis failed".to_string()))
            .expect("failed");
        assert_eq!(workflow.screen(), Screen::Situation);
        assert!(!workflow.busy());
        assert_eq!(workflow.take_error(), Some("analysis failed".to_string()));
        assert_eq!(workflow.take_error(), None);
    }

    #[test]
    fn synthesis_requires_every_answer() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        workflow
            .handle(WorkflowEvent::SubmitSituation("dilemma".to_string()))
            .expect("submit");
        let reflections = reflections_for(&workflow, 2);
        workflow
            .handle(WorkflowEvent::AnalysisCompleted(reflections))
            .expect("completed");

        assert_eq!(
            workflow.handle(WorkflowEvent::SubmitReflections),
            Err(WorkflowError::UnansweredReflection)
        );

        workflow
            .handle(WorkflowEvent::AnswerReflection {
                index: 0,
                answer: "first".to_string(),
            })
            .expect("answer");
        assert_eq!(
            workflow.handle(WorkflowEvent::SubmitReflections),
            Err(WorkflowError::UnansweredReflection)
        );

        workflow
            .handle(WorkflowEvent::AnswerReflection {
                index: 1,
                answer: "second".to_string(),
            })
            .expect("answer");
        let effects = workflow.handle(WorkflowEvent::SubmitReflections).expect("submit");
        assert!(matches!(effects[0], Effect::Synthesize { .. }));
        assert!(workflow.busy());
    }

    #[test]
    fn synthesis_success_archives_most_recent_first() {
        let mut workflow = ready_workflow();
        for round in 0..2 {
            workflow.handle(WorkflowEvent::StartDecision).expect("start");
            workflow
                .handle(WorkflowEvent::SubmitSituation(format!("dilemma {round}")))
                .expect("submit");
            let reflections = reflections_for(&workflow, 1);
            workflow
                .handle(WorkflowEvent::AnalysisCompleted(reflections))
                .expect("completed");
            workflow
                .handle(WorkflowEvent::AnswerReflection {
                    index: 0,
                    answer: "because".to_string(),
                })
                .expect("answer");
            workflow.handle(WorkflowEvent::SubmitReflections).expect("submit");
            let effects = workflow
                .handle(WorkflowEvent::SynthesisCompleted(format!("advice {round}")))
                .expect("synthesis");
            assert_eq!(effects, vec![Effect::PersistDecisions]);
            assert_eq!(workflow.screen(), Screen::Advice);
            workflow.handle(WorkflowEvent::AcknowledgeAdvice).expect("ack");
        }
        assert_eq!(workflow.history().len(), 2);
        assert_eq!(workflow.history()[0].final_advice, "advice 1");
        assert_eq!(workflow.history()[1].final_advice, "advice 0");
        assert_eq!(workflow.screen(), Screen::Dashboard);
        assert_eq!(workflow.draft(), None);
    }

    #[test]
    fn synthesis_failure_keeps_draft_and_history() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        workflow
            .handle(WorkflowEvent::SubmitSituation("dilemma".to_string()))
            .expect("submit");
        let reflections = reflections_for(&workflow, 1);
        workflow
            .handle(WorkflowEvent::AnalysisCompleted(reflections))
            .expect("completed");
        workflow
            .handle(WorkflowEvent::AnswerReflection {
                index: 0,
                answer: "because".to_string(),
            })
            .expect("answer");
        workflow.handle(WorkflowEvent::SubmitReflections).expect("submit");
        workflow
            .handle(WorkflowEvent::SynthesisFailed("synthesis failed".to_string()))
            .expect("failed");
        assert_eq!(workflow.screen(), Screen::Reflection);
        assert!(workflow.history().is_empty());
        assert_eq!(workflow.draft().expect("draft").reflections.len(), 1);
        assert!(!workflow.busy());
    }

    #[test]
    fn history_detail_delete_persists() {
        let mut workflow = ready_workflow();
        workflow.handle(WorkflowEvent::StartDecision).expect("start");
        workflow
            .handle(WorkflowEvent::SubmitSituation("dilemma".to_string()))
            .expect("submit");
        let reflections = reflections_for(&workflow, 1);
        workflow
            .handle(WorkflowEvent::AnalysisCompleted(reflections))
            .expect("completed");
        workflow
            .handle(WorkflowEvent::AnswerReflection {
                index: 0,
                answer: "because".to_string(),
            })
            .expect("answer");
        workflow.handle(WorkflowEvent::SubmitReflections).expect("submit");
        workflow
            .handle(WorkflowEvent::SynthesisCompleted("advice".to_string()))
            .expect("synthesis");
        workflow.handle(WorkflowEvent::AcknowledgeAdvice).expect("ack");

        workflow.handle(WorkflowEvent::OpenHistory).expect("open");
        assert_eq!(
            workflow.handle(WorkflowEvent::OpenHistoryDetail(3)),
            Err(WorkflowError::UnknownRecord(3))
        );
        workflow.handle(WorkflowEvent::OpenHistoryDetail(0)).expect("detail");
        let effects = workflow.handle(WorkflowEvent::DeleteRecord).expect("delete");
        assert_eq!(effects, vec![Effect::PersistDecisions]);
        assert_eq!(workflow.screen(), Screen::History);
        assert!(workflow.history().is_empty());
    }

    #[test]
    fn credential_flow_updates_status() {
        let mut workflow =
            Workflow::bootstrap(Some(vec![Principle::new("Courage", "act")]), Vec::new(), false);
        assert_eq!(
            workflow.handle(WorkflowEvent::CredentialSubmitted("  ".to_string())),
            Err(WorkflowError::EmptyCredential)
        );
        let effects = workflow
            .handle(WorkflowEvent::CredentialSubmitted("sk-test".to_string()))
            .expect("submit");
        assert_eq!(effects, vec![Effect::ValidateCredential("sk-test".to_string())]);
        assert_eq!(workflow.credential(), CredentialStatus::Testing);

        workflow
            .handle(WorkflowEvent::CredentialValidated {
                secret: "sk-test".to_string(),
                valid: false,
            })
            .expect("invalid");
        assert_eq!(workflow.credential(), CredentialStatus::Invalid);

        let effects = workflow
            .handle(WorkflowEvent::CredentialValidated {
                secret: "sk-test".to_string(),
                valid: true,
            })
            .expect("valid");
        assert_eq!(
            effects,
            vec![Effect::PersistCredential("sk-test".to_string())]
        );
        assert_eq!(workflow.credential(), CredentialStatus::Valid);
    }

    #[test]
    fn stale_completion_events_are_dropped() {
        let mut workflow = ready_workflow();
        // Synthesis result with no decision in flight must not archive anything.
        let effects = workflow
            .handle(WorkflowEvent::SynthesisCompleted("advice".to_string()))
            .expect("stale");
        assert_eq!(effects, Vec::new());
        assert!(workflow.history().is_empty());
        assert_eq!(workflow.screen(), Screen::Dashboard);
    }
}
