//! Rendering routines for the keel TUI.

use crate::app::{App, EditorMode, SPINNER_FRAMES};
use keel_core::{CredentialStatus, Screen};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap};

const PRIMARY: Color = Color::Rgb(86, 182, 194); // teal
const TEXT: Color = Color::Rgb(230, 230, 230);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(86, 182, 194);
const WARN: Color = Color::Rgb(229, 192, 123);
const ERROR: Color = Color::Rgb(224, 108, 117);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire frame.
pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(2), // key hints
            Constraint::Length(1), // status bar
        ])
        .split(frame.area());

    draw_header(frame, app, root[0]);
    match app.engine.workflow().screen() {
        Screen::Onboarding => draw_editor(frame, app, root[1], true),
        Screen::Dashboard => draw_dashboard(frame, app, root[1]),
        Screen::Principles => draw_editor(frame, app, root[1], false),
        Screen::Situation => draw_situation(frame, app, root[1]),
        Screen::Reflection => draw_reflection(frame, app, root[1]),
        Screen::Advice => draw_advice(frame, app, root[1]),
        Screen::History => draw_history(frame, app, root[1]),
        Screen::HistoryDetail(index) => draw_history_detail(frame, app, root[1], index),
    }
    draw_hints(frame, app, root[2]);
    draw_status_bar(frame, app, root[3]);

    if app.credential_overlay {
        draw_credential_overlay(frame, app);
    }
}

/// Header with the app name, screen label, and credential state.
fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let screen_label = match app.engine.workflow().screen() {
        Screen::Onboarding => "onboarding",
        Screen::Dashboard => "dashboard",
        Screen::Principles => "principles",
        Screen::Situation => "new decision",
        Screen::Reflection => "reflection",
        Screen::Advice => "advice",
        Screen::History => "history",
        Screen::HistoryDetail(_) => "decision",
    };
    let credential = match app.engine.workflow().credential() {
        CredentialStatus::Missing => Span::styled("credential: none", Style::default().fg(WARN)),
        CredentialStatus::Testing => {
            Span::styled("credential: testing", Style::default().fg(TEXT_MUTED))
        }
        CredentialStatus::Valid => {
            Span::styled("credential: ok", Style::default().fg(TEXT_MUTED))
        }
        CredentialStatus::Invalid => {
            Span::styled("credential: rejected", Style::default().fg(ERROR))
        }
    };
    let line = Line::from(vec![
        Span::styled(
            " keel ",
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("v{VERSION}  "), Style::default().fg(TEXT_MUTED)),
        Span::styled(screen_label, Style::default().fg(TEXT)),
        Span::styled("  ", Style::default()),
        credential,
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Dashboard summary.
fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let workflow = app.engine.workflow();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Decide with your own principles.",
            Style::default().fg(TEXT),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  principles ", Style::default().fg(TEXT_MUTED)),
            Span::styled(
                workflow.principles().len().to_string(),
                Style::default().fg(TEXT),
            ),
            Span::styled("   decisions ", Style::default().fg(TEXT_MUTED)),
            Span::styled(workflow.history().len().to_string(), Style::default().fg(TEXT)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

/// Principle editor, shared by onboarding and the principle manager.
fn draw_editor(frame: &mut Frame<'_>, app: &App, area: Rect, onboarding: bool) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(6)])
        .split(area);

    let title = if onboarding {
        " your starting principles (edit freely, up to 10) "
    } else {
        " principles (up to 10) "
    };
    let items: Vec<ListItem<'_>> = app
        .editor
        .list
        .iter()
        .enumerate()
        .map(|(index, principle)| {
            let marker = if index == app.editor.selected { "> " } else { "  " };
            let style = if index == app.editor.selected {
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{marker}{}. ", index + 1), style),
                Span::styled(principle.title.clone(), style),
                Span::styled(
                    format!("  {}", principle.description),
                    Style::default().fg(TEXT_MUTED),
                ),
            ]))
        })
        .collect();
    let list_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(title);
    frame.render_widget(List::new(items).block(list_block), rows[0]);

    let detail: Vec<Line<'_>> = match app.editor.mode {
        EditorMode::Browse => vec![Line::from(Span::styled(
            if app.editor.dirty {
                " unsaved changes"
            } else {
                " "
            },
            Style::default().fg(WARN),
        ))],
        EditorMode::EditTitle => vec![
            Line::from(vec![
                Span::styled(" title: ", Style::default().fg(TEXT_MUTED)),
                Span::styled(format!("{}_", app.editor.title_input), Style::default().fg(TEXT)),
            ]),
            Line::from(Span::styled(
                format!(" description: {}", app.editor.description_input),
                Style::default().fg(TEXT_MUTED),
            )),
        ],
        EditorMode::EditDescription => vec![
            Line::from(Span::styled(
                format!(" title: {}", app.editor.title_input),
                Style::default().fg(TEXT_MUTED),
            )),
            Line::from(vec![
                Span::styled(" description: ", Style::default().fg(TEXT_MUTED)),
                Span::styled(
                    format!("{}_", app.editor.description_input),
                    Style::default().fg(TEXT),
                ),
            ]),
        ],
        EditorMode::ConfirmDelete => vec![Line::from(Span::styled(
            " delete this principle? (y/n)",
            Style::default().fg(ERROR),
        ))],
    };
    let detail_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(match app.editor.mode {
            EditorMode::Browse => BORDER,
            _ => BORDER_ACTIVE,
        }));
    frame.render_widget(Paragraph::new(detail).block(detail_block), rows[1]);
}

/// Situation input screen.
fn draw_situation(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(5)])
        .split(area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "  What are you trying to decide? Describe the situation.",
            Style::default().fg(TEXT),
        ))),
        rows[0],
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(" situation ");
    let text = if app.busy() {
        app.input.clone()
    } else {
        format!("{}_", app.input)
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT))
            .wrap(Wrap { trim: false })
            .block(block),
        rows[1],
    );
}

/// Reflection answering screen.
fn draw_reflection(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let reflections = app
        .engine
        .workflow()
        .draft()
        .map(|draft| draft.reflections.clone())
        .unwrap_or_default();

    if reflections.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  None of your principles clearly matched this situation.",
                    Style::default().fg(TEXT),
                )),
                Line::from(Span::styled(
                    "  Press Esc to go back, then rephrase or revisit your principles.",
                    Style::default().fg(TEXT_MUTED),
                )),
            ]),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let mut lines = Vec::new();
    for (index, reflection) in reflections.iter().enumerate() {
        let focused = index == app.answer_index;
        let title_style = if focused {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        lines.push(Line::from(Span::styled(
            format!(" {} {}", if focused { ">" } else { " " }, reflection.principle_title),
            title_style,
        )));
        lines.push(Line::from(Span::styled(
            format!("   {}", reflection.question),
            Style::default().fg(TEXT),
        )));
        let answer = reflection.answer.as_deref().unwrap_or("(unanswered)");
        lines.push(Line::from(Span::styled(
            format!("   {answer}"),
            if reflection.is_answered() {
                Style::default().fg(TEXT_MUTED)
            } else {
                Style::default().fg(WARN)
            },
        )));
        lines.push(Line::from(""));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .title(" reflect before you decide "),
        ),
        rows[0],
    );

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_ACTIVE))
        .title(" your answer ");
    let text = if app.busy() {
        app.input.clone()
    } else {
        format!("{}_", app.input)
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(TEXT))
            .wrap(Wrap { trim: false })
            .block(input_block),
        rows[1],
    );
}

/// Advice screen for the just-archived decision.
fn draw_advice(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(record) = app.engine.workflow().history().first() else {
        frame.render_widget(
            Paragraph::new(" no decision recorded").style(Style::default().fg(TEXT_MUTED)),
            area,
        );
        return;
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", record.situation),
            Style::default().fg(TEXT_MUTED),
        )),
        Line::from(""),
    ];
    for advice_line in record.final_advice.lines() {
        lines.push(Line::from(Span::styled(
            format!(" {advice_line}"),
            Style::default().fg(TEXT),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_ACTIVE))
                .title(" advice "),
        ),
        area,
    );
}

/// History list, most recent first.
fn draw_history(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let history = app.engine.workflow().history();
    if history.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  No decisions archived yet.",
                    Style::default().fg(TEXT_MUTED),
                )),
            ]),
            area,
        );
        return;
    }
    let items: Vec<ListItem<'_>> = history
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let selected = index == app.history_selected;
            let style = if selected {
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT)
            };
            let marker = if selected { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{marker}{} ", record.date.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(TEXT_MUTED),
                ),
                Span::styled(truncate(&record.situation, 64), style),
            ]))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .title(" past decisions "),
        ),
        area,
    );
}

/// Full record view.
fn draw_history_detail(frame: &mut Frame<'_>, app: &App, area: Rect, index: usize) {
    let Some(record) = app.engine.workflow().history().get(index) else {
        return;
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" {}", record.date.format("%Y-%m-%d %H:%M")),
            Style::default().fg(TEXT_MUTED),
        )),
        Line::from(Span::styled(
            format!(" {}", record.situation),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for reflection in &record.reflections {
        lines.push(Line::from(Span::styled(
            format!(" {}", reflection.principle_title),
            Style::default().fg(PRIMARY),
        )));
        lines.push(Line::from(Span::styled(
            format!("   Q: {}", reflection.question),
            Style::default().fg(TEXT),
        )));
        lines.push(Line::from(Span::styled(
            format!("   A: {}", reflection.answer.as_deref().unwrap_or_default()),
            Style::default().fg(TEXT_MUTED),
        )));
    }
    lines.push(Line::from(""));
    for advice_line in record.final_advice.lines() {
        lines.push(Line::from(Span::styled(
            format!(" {advice_line}"),
            Style::default().fg(TEXT),
        )));
    }
    if app.confirm_delete {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            " delete this record permanently? (y/n)",
            Style::default().fg(ERROR),
        )));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER))
                .title(" decision "),
        ),
        area,
    );
}

/// Context-sensitive key hints.
fn draw_hints(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints = if app.credential_overlay {
        "Enter submit  Esc cancel"
    } else {
        match app.engine.workflow().screen() {
            Screen::Onboarding => {
                "↑/↓ select  a add  e edit  d delete  Ctrl-S begin journaling"
            }
            Screen::Dashboard => "n new decision  p principles  h history  c credential  q quit",
            Screen::Principles => "↑/↓ select  a add  e edit  d delete  Ctrl-S save  Esc back",
            Screen::Situation => "Enter analyze  Esc cancel",
            Screen::Reflection => "↑/↓ question  Enter save answer  Ctrl-S get advice  Esc cancel",
            Screen::Advice => "Enter done",
            Screen::History => "↑/↓ select  Enter open  Esc back",
            Screen::HistoryDetail(_) => "d delete  Esc back",
        }
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(BORDER));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(TEXT_MUTED),
        )))
        .block(block),
        area,
    );
}

/// Status bar with spinner while a call is outstanding.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = if app.busy() {
        Line::from(vec![
            Span::styled(
                format!(" {} ", SPINNER_FRAMES[app.spinner_frame]),
                Style::default().fg(PRIMARY),
            ),
            Span::styled("waiting for the model…", Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(TEXT_MUTED),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Centered credential entry overlay; input is masked.
fn draw_credential_overlay(frame: &mut Frame<'_>, app: &App) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);
    let masked = "•".repeat(app.credential_input.chars().count());
    let status = match app.engine.workflow().credential() {
        CredentialStatus::Testing => Span::styled("testing…", Style::default().fg(TEXT_MUTED)),
        CredentialStatus::Invalid => Span::styled(
            "rejected, check the key and try again",
            Style::default().fg(ERROR),
        ),
        _ => Span::styled(
            "stored locally, obfuscated but not encrypted",
            Style::default().fg(TEXT_MUTED),
        ),
    };
    let lines = vec![
        Line::from(Span::styled(
            " Enter your API credential",
            Style::default().fg(TEXT),
        )),
        Line::from(Span::styled(
            format!(" {masked}_"),
            Style::default().fg(TEXT),
        )),
        Line::from(status),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_ACTIVE))
                .title(" credential "),
        ),
        area,
    );
}

/// Fixed-height rectangle centered in the given area.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

/// Truncate a string for a one-line summary.
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
