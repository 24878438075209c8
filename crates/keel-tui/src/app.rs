//! View state for the keel TUI.

use keel::Engine;
use keel_core::{CredentialStatus, Principle, Screen};
use log::debug;

/// Spinner frames shown while a gateway call is outstanding.
pub const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Editing mode inside the principle editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    /// Moving through the list.
    Browse,
    /// Editing the title field.
    EditTitle,
    /// Editing the description field.
    EditDescription,
    /// Waiting for delete confirmation.
    ConfirmDelete,
}

/// Working copy of the principle set, edited in memory until saved.
#[derive(Debug)]
pub struct PrincipleEditor {
    /// Principles being edited.
    pub list: Vec<Principle>,
    /// Selected list index.
    pub selected: usize,
    /// Current editing mode.
    pub mode: EditorMode,
    /// Title buffer while editing.
    pub title_input: String,
    /// Description buffer while editing.
    pub description_input: String,
    /// Whether the edit in progress inserts a new principle.
    pub inserting: bool,
    /// Whether the working copy differs from the saved set.
    pub dirty: bool,
}

impl PrincipleEditor {
    /// Start editing a copy of the given set.
    pub fn open(list: Vec<Principle>) -> Self {
        Self {
            list,
            selected: 0,
            mode: EditorMode::Browse,
            title_input: String::new(),
            description_input: String::new(),
            inserting: false,
            dirty: false,
        }
    }

    /// Move the selection up.
    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the selection down.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.list.len() {
            self.selected += 1;
        }
    }

    /// Begin inserting a new principle.
    pub fn begin_insert(&mut self) {
        self.inserting = true;
        self.title_input.clear();
        self.description_input.clear();
        self.mode = EditorMode::EditTitle;
    }

    /// Begin editing the selected principle.
    pub fn begin_edit(&mut self) {
        let Some(principle) = self.list.get(self.selected) else {
            return;
        };
        self.inserting = false;
        self.title_input = principle.title.clone();
        self.description_input = principle.description.clone();
        self.mode = EditorMode::EditTitle;
    }

    /// Commit the edit buffers into the list.
    pub fn commit_edit(&mut self) {
        if self.title_input.trim().is_empty() {
            self.mode = EditorMode::Browse;
            return;
        }
        if self.inserting {
            self.list
                .push(Principle::new(self.title_input.trim(), self.description_input.trim()));
            self.selected = self.list.len() - 1;
        } else if let Some(principle) = self.list.get_mut(self.selected) {
            principle.title = self.title_input.trim().to_string();
            principle.description = self.description_input.trim().to_string();
        }
        self.dirty = true;
        self.mode = EditorMode::Browse;
    }

    /// Delete the selected principle after confirmation.
    pub fn delete_selected(&mut self) {
        if self.selected < self.list.len() {
            self.list.remove(self.selected);
            if self.selected >= self.list.len() && self.selected > 0 {
                self.selected -= 1;
            }
            self.dirty = true;
        }
        self.mode = EditorMode::Browse;
    }
}

/// Top-level view state wrapping the engine.
pub struct App {
    /// Application engine (workflow + store + gateway).
    pub engine: Engine,
    /// Shared single-line text input buffer.
    pub input: String,
    /// Status line text.
    pub status: String,
    /// Spinner frame index, advanced on ticks.
    pub spinner_frame: usize,
    /// Principle editor, active on Onboarding and Principles screens.
    pub editor: PrincipleEditor,
    /// Focused reflection question index.
    pub answer_index: usize,
    /// Selected history list index.
    pub history_selected: usize,
    /// Whether the credential overlay is open.
    pub credential_overlay: bool,
    /// Credential input buffer.
    pub credential_input: String,
    /// Whether history-detail delete awaits confirmation.
    pub confirm_delete: bool,
    /// Screen observed after the previous event, for change detection.
    last_screen: Screen,
}

impl App {
    /// Build the view state around a bootstrapped engine.
    pub fn new(engine: Engine) -> Self {
        let screen = engine.workflow().screen();
        let editor = PrincipleEditor::open(engine.workflow().principles().as_slice().to_vec());
        Self {
            engine,
            input: String::new(),
            status: String::new(),
            spinner_frame: 0,
            editor,
            answer_index: 0,
            history_selected: 0,
            credential_overlay: false,
            credential_input: String::new(),
            confirm_delete: false,
            last_screen: screen,
        }
    }

    /// Advance the spinner one frame.
    pub fn tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    /// Whether a gateway call is outstanding.
    pub fn busy(&self) -> bool {
        self.engine.workflow().busy()
    }

    /// Reconcile view state after a workflow transition.
    ///
    /// Screen-local buffers (editor copy, answer focus, selections) reset
    /// when the workflow lands on their screen from somewhere else.
    pub fn sync_screen(&mut self) {
        let screen = self.engine.workflow().screen();
        if screen == self.last_screen {
            self.sync_credential_overlay();
            return;
        }
        debug!("screen changed (from={:?}, to={screen:?})", self.last_screen);
        match screen {
            Screen::Onboarding | Screen::Principles => {
                self.editor =
                    PrincipleEditor::open(self.engine.workflow().principles().as_slice().to_vec());
            }
            Screen::Situation => {
                self.input.clear();
            }
            Screen::Reflection => {
                self.focus_answer(0);
            }
            Screen::History => {
                self.history_selected = 0;
                self.confirm_delete = false;
            }
            Screen::HistoryDetail(_) => {
                self.confirm_delete = false;
            }
            Screen::Dashboard | Screen::Advice => {
                self.input.clear();
            }
        }
        self.last_screen = screen;
        self.sync_credential_overlay();
    }

    /// Close the credential overlay once a credential is accepted.
    fn sync_credential_overlay(&mut self) {
        if self.credential_overlay
            && self.engine.workflow().credential() == CredentialStatus::Valid
        {
            self.credential_overlay = false;
            self.credential_input.clear();
            self.status = "credential accepted".to_string();
        }
    }

    /// Focus a reflection question, loading its saved answer into the input.
    pub fn focus_answer(&mut self, index: usize) {
        self.answer_index = index;
        self.input = self
            .engine
            .workflow()
            .draft()
            .and_then(|draft| draft.reflections.get(index))
            .and_then(|reflection| reflection.answer.clone())
            .unwrap_or_default();
    }

    /// Move the history selection up.
    pub fn history_previous(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// Move the history selection down.
    pub fn history_next(&mut self) {
        if self.history_selected + 1 < self.engine.workflow().history().len() {
            self.history_selected += 1;
        }
    }
}
