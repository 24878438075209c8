//! Terminal frontend for the keel decision journal.

mod app;
mod event;
mod ui;

use anyhow::Context;
use app::{App, EditorMode};
use clap::Parser;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use keel::{Command, Engine};
use keel_config::KeelConfig;
use keel_core::{MAX_PRINCIPLES, Screen, WorkflowEvent};
use keel_gateway::{DecisionGateway, HttpGateway};
use keel_store::FileStore;
use log::{debug, info};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Command-line options for the keel TUI.
#[derive(Parser)]
#[command(name = "keel", version)]
struct Cli {
    /// Optional path to a keel.json5 config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the storage directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Override the chat model name
    #[arg(long)]
    model: Option<String>,
    /// Override the output language tag
    #[arg(long)]
    locale: Option<String>,
}

/// Entry point for the keel TUI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    keel::init_logging();
    let cli = Cli::parse();

    let mut config = if let Some(path) = cli.config.as_ref() {
        KeelConfig::load_from_path(path).context("failed to load config")?
    } else {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        KeelConfig::load_layered(&cwd).context("failed to load layered config")?
    };
    if let Some(model) = cli.model {
        config.gateway.model = model;
    }
    if let Some(locale) = cli.locale {
        config.gateway.locale = locale;
    }
    if let Some(data_dir) = cli.data_dir {
        config.storage.path = Some(data_dir.display().to_string());
    }

    let store_root = config.storage.resolve_root();
    info!("starting keel (store_root={})", store_root.display());
    let store = FileStore::new(&store_root).context("failed to open the data directory")?;
    let gateway: Arc<dyn DecisionGateway> =
        Arc::new(HttpGateway::new(&config.gateway).context("failed to build the gateway")?);
    let mut app = App::new(Engine::bootstrap(store, gateway));

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;
        let Some(event) = rx.recv().await else { break };
        if handle_app_event(&mut app, event, &tx) {
            break;
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(app: &mut App, event: AppEvent, sender: &mpsc::Sender<AppEvent>) -> bool {
    match event {
        AppEvent::Input(key) => handle_input(app, key, sender),
        AppEvent::Tick => {
            app.tick();
            false
        }
        AppEvent::Workflow(event) => {
            dispatch(app, event, sender);
            false
        }
    }
}

/// Feed an event to the engine, spawn any gateway work, and surface errors.
fn dispatch(app: &mut App, event: WorkflowEvent, sender: &mpsc::Sender<AppEvent>) -> bool {
    let ok = match app.engine.dispatch(event) {
        Ok(commands) => {
            for command in commands {
                match command {
                    Command::PromptCredential => {
                        app.credential_overlay = true;
                        app.credential_input.clear();
                        app.status = "an API credential is required first".to_string();
                    }
                    command => spawn_command(app.engine.gateway(), command, sender.clone()),
                }
            }
            true
        }
        Err(err) => {
            app.status = err.to_string();
            false
        }
    };
    if let Some(error) = app.engine.take_error() {
        app.status = error;
    }
    app.sync_screen();
    ok
}

/// Run a gateway command off-thread and feed the result back into the loop.
fn spawn_command(
    gateway: Arc<dyn DecisionGateway>,
    command: Command,
    sender: mpsc::Sender<AppEvent>,
) {
    debug!("spawning gateway command");
    tokio::spawn(async move {
        if let Some(event) = Engine::run(gateway, command).await {
            let _ = sender.send(AppEvent::Workflow(event)).await;
        }
    });
}

/// Handle keyboard input; returns true to exit.
fn handle_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if app.credential_overlay {
        handle_credential_input(app, key, sender);
        return false;
    }
    // One outstanding gateway call at a time: lock input while waiting.
    if app.busy() {
        return false;
    }

    match app.engine.workflow().screen() {
        Screen::Onboarding => handle_editor_input(app, key, sender, true),
        Screen::Principles => handle_editor_input(app, key, sender, false),
        Screen::Dashboard => return handle_dashboard_input(app, key, sender),
        Screen::Situation => handle_situation_input(app, key, sender),
        Screen::Reflection => handle_reflection_input(app, key, sender),
        Screen::Advice => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                dispatch(app, WorkflowEvent::AcknowledgeAdvice, sender);
            }
        }
        Screen::History => handle_history_input(app, key, sender),
        Screen::HistoryDetail(_) => handle_history_detail_input(app, key, sender),
    }
    false
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) -> bool {
    match key.code {
        KeyCode::Char('n') => {
            dispatch(app, WorkflowEvent::StartDecision, sender);
        }
        KeyCode::Char('p') => {
            dispatch(app, WorkflowEvent::OpenPrinciples, sender);
        }
        KeyCode::Char('h') => {
            dispatch(app, WorkflowEvent::OpenHistory, sender);
        }
        KeyCode::Char('c') => {
            app.credential_overlay = true;
            app.credential_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

/// Shared editor handler for onboarding and the principle manager.
fn handle_editor_input(
    app: &mut App,
    key: KeyEvent,
    sender: &mpsc::Sender<AppEvent>,
    onboarding: bool,
) {
    match app.editor.mode {
        EditorMode::Browse => match key.code {
            KeyCode::Up => app.editor.select_previous(),
            KeyCode::Down => app.editor.select_next(),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let list = app.editor.list.clone();
                let event = if onboarding {
                    WorkflowEvent::FinishOnboarding(list)
                } else {
                    WorkflowEvent::SavePrinciples(list)
                };
                if dispatch(app, event, sender) {
                    app.editor.dirty = false;
                    if !onboarding {
                        app.status = "principles saved".to_string();
                    }
                }
            }
            KeyCode::Char('a') => {
                if app.editor.list.len() >= MAX_PRINCIPLES {
                    app.status = format!("you already keep {MAX_PRINCIPLES} principles");
                } else {
                    app.editor.begin_insert();
                }
            }
            KeyCode::Char('e') => app.editor.begin_edit(),
            KeyCode::Char('d') => {
                if !app.editor.list.is_empty() {
                    app.editor.mode = EditorMode::ConfirmDelete;
                }
            }
            KeyCode::Esc => {
                if !onboarding {
                    dispatch(app, WorkflowEvent::ClosePrinciples, sender);
                }
            }
            _ => {}
        },
        EditorMode::EditTitle => match key.code {
            KeyCode::Enter => app.editor.mode = EditorMode::EditDescription,
            KeyCode::Esc => app.editor.mode = EditorMode::Browse,
            KeyCode::Backspace => {
                app.editor.title_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.editor.title_input.push(ch);
            }
            _ => {}
        },
        EditorMode::EditDescription => match key.code {
            KeyCode::Enter => app.editor.commit_edit(),
            KeyCode::Esc => app.editor.mode = EditorMode::Browse,
            KeyCode::Backspace => {
                app.editor.description_input.pop();
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.editor.description_input.push(ch);
            }
            _ => {}
        },
        EditorMode::ConfirmDelete => match key.code {
            KeyCode::Char('y') => app.editor.delete_selected(),
            KeyCode::Char('n') | KeyCode::Esc => app.editor.mode = EditorMode::Browse,
            _ => {}
        },
    }
}

fn handle_situation_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Enter => {
            let situation = app.input.clone();
            dispatch(app, WorkflowEvent::SubmitSituation(situation), sender);
        }
        KeyCode::Esc => {
            dispatch(app, WorkflowEvent::CancelDecision, sender);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(ch);
        }
        _ => {}
    }
}

fn handle_reflection_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) {
    let count = app
        .engine
        .workflow()
        .draft()
        .map(|draft| draft.reflections.len())
        .unwrap_or(0);
    match key.code {
        KeyCode::Esc => {
            dispatch(app, WorkflowEvent::CancelDecision, sender);
        }
        KeyCode::Up if count > 0 => {
            let index = app.answer_index.saturating_sub(1);
            app.focus_answer(index);
        }
        KeyCode::Down if count > 0 => {
            let index = (app.answer_index + 1).min(count - 1);
            app.focus_answer(index);
        }
        KeyCode::Enter if count > 0 => {
            let answer = app.input.clone();
            let index = app.answer_index;
            if dispatch(app, WorkflowEvent::AnswerReflection { index, answer }, sender) {
                // Jump to the next unanswered question, if any.
                let next = app
                    .engine
                    .workflow()
                    .draft()
                    .and_then(|draft| {
                        draft
                            .reflections
                            .iter()
                            .position(|reflection| !reflection.is_answered())
                    })
                    .unwrap_or(index);
                app.focus_answer(next);
            }
        }
        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            dispatch(app, WorkflowEvent::SubmitReflections, sender);
        }
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(ch);
        }
        _ => {}
    }
}

fn handle_history_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Up => app.history_previous(),
        KeyCode::Down => app.history_next(),
        KeyCode::Enter => {
            let index = app.history_selected;
            dispatch(app, WorkflowEvent::OpenHistoryDetail(index), sender);
        }
        KeyCode::Esc => {
            dispatch(app, WorkflowEvent::CloseHistory, sender);
        }
        _ => {}
    }
}

fn handle_history_detail_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) {
    if app.confirm_delete {
        match key.code {
            KeyCode::Char('y') => {
                app.confirm_delete = false;
                dispatch(app, WorkflowEvent::DeleteRecord, sender);
            }
            KeyCode::Char('n') | KeyCode::Esc => app.confirm_delete = false,
            _ => {}
        }
        return;
    }
    match key.code {
        KeyCode::Char('d') => app.confirm_delete = true,
        KeyCode::Esc => {
            dispatch(app, WorkflowEvent::CloseHistoryDetail, sender);
        }
        _ => {}
    }
}

fn handle_credential_input(app: &mut App, key: KeyEvent, sender: &mpsc::Sender<AppEvent>) {
    match key.code {
        KeyCode::Enter => {
            let secret = app.credential_input.clone();
            dispatch(app, WorkflowEvent::CredentialSubmitted(secret), sender);
        }
        KeyCode::Esc => {
            app.credential_overlay = false;
            app.credential_input.clear();
        }
        KeyCode::Backspace => {
            app.credential_input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.credential_input.push(ch);
        }
        _ => {}
    }
}

/// Spawn a task to poll for keyboard events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = crossterm::event::poll(Duration::from_millis(30)) {
                let event = match crossterm::event::read() {
                    Ok(event) => event,
                    Err(_) => break,
                };
                if let CrosstermEvent::Key(key) = event {
                    let _ = sender.send(AppEvent::Input(key)).await;
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });
}

/// Spawn a periodic tick generator for the spinner.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(150));
        loop {
            interval.tick().await;
            let _ = sender.send(AppEvent::Tick).await;
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
