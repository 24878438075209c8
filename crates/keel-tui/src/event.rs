//! TUI event types for input, ticks, and finished gateway work.

use crossterm::event::KeyEvent;
use keel_core::WorkflowEvent;

/// Application event consumed by the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick for spinner animation.
    Tick,
    /// Workflow event, usually a completed gateway call.
    Workflow(WorkflowEvent),
}
