//! Rendering
//!
//! Draws a [`SurfaceState`] into a ratatui frame. Pure: reads state, writes
//! widgets, changes nothing.
//!
//! ```text
//! ┌ aicalc · Standard ─────────────────┐
//! │                          5 + 3 =   │
//! │                                8   │
//! │ explanation (AI mode)              │
//! └────────────────────────────────────┘
//! ┌ Prompt / Keys ─────────────────────┐
//! └────────────────────────────────────┘
//!  status line
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use aicalc_core::CalcMode;

use crate::display::SurfaceState;
use crate::theme;

/// Height of the display block (borders included)
const DISPLAY_HEIGHT: u16 = 7;

/// Height of the prompt / key help block
const INPUT_HEIGHT: u16 = 4;

/// Keypad hint shown in standard mode
const STANDARD_KEYS: &str =
    "0-9 . digits   + - * / ops   = Enter   % percent   n sign   Bksp   Esc clear";

/// Draw the whole UI
pub fn draw_ui(frame: &mut Frame, state: &SurfaceState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(DISPLAY_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_display(frame, chunks[0], state);
    draw_input(frame, chunks[1], state);
    draw_status_bar(frame, chunks[3], state);

    if state.history_open {
        draw_history_panel(frame, chunks[2], state);
    }
}

fn draw_display(frame: &mut Frame, area: Rect, state: &SurfaceState) {
    let snapshot = &state.snapshot;
    let accent = theme::mode_accent(snapshot.mode);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" aicalc · {} ", snapshot.mode.label()));

    let mut lines = vec![
        Line::from(Span::styled(
            snapshot.expression_label.clone(),
            Style::default().fg(theme::EXPRESSION_TEXT),
        ))
        .alignment(Alignment::Right),
        Line::from(Span::styled(
            snapshot.current_text.clone(),
            theme::display_style(),
        ))
        .alignment(Alignment::Right),
    ];

    if !snapshot.explanation.is_empty() {
        let width = usize::from(area.width.saturating_sub(2)).max(10);
        for wrapped in textwrap::wrap(&snapshot.explanation, width) {
            lines.push(Line::from(Span::styled(
                wrapped.into_owned(),
                Style::default().fg(theme::EXPLANATION_TEXT),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_input(frame: &mut Frame, area: Rect, state: &SurfaceState) {
    let snapshot = &state.snapshot;

    let (title, body) = match snapshot.mode {
        CalcMode::Standard => (
            " Keys ",
            Line::from(Span::styled(
                STANDARD_KEYS,
                Style::default().fg(theme::DIM_GRAY),
            )),
        ),
        CalcMode::Ai => {
            let cursor = if snapshot.solving { "" } else { "_" };
            (
                " Prompt ",
                Line::from(vec![
                    Span::styled("> ", Style::default().fg(theme::AI_ACCENT)),
                    Span::styled(
                        format!("{}{}", snapshot.prompt_draft, cursor),
                        Style::default().fg(theme::PROMPT_GREEN),
                    ),
                ]),
            )
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::DIM_GRAY))
        .title(title);

    let paragraph = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_history_panel(frame: &mut Frame, area: Rect, state: &SurfaceState) {
    let items: Vec<ListItem> = if state.history.is_empty() {
        vec![ListItem::new(Span::styled(
            "No history yet",
            Style::default().fg(theme::DIM_GRAY),
        ))]
    } else {
        state
            .history
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::raw(entry.prompt_text().to_string()),
                    Span::styled(" = ", Style::default().fg(theme::DIM_GRAY)),
                    Span::styled(
                        entry.result_text().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::AI_ACCENT))
                .title(" History (Enter to restore, F2 to close) "),
        )
        .highlight_style(Style::default().bg(theme::SELECTION_BG));

    let mut list_state = ListState::default();
    list_state.select(state.selected_index());

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, state: &SurfaceState) {
    let left = match &state.notification {
        Some(notification) => Span::styled(
            format!(" {}", notification.line()),
            theme::notify_style(notification.level),
        ),
        None => Span::styled(
            format!(" {}", state.conductor_state.description()),
            Style::default().fg(theme::DIM_GRAY),
        ),
    };

    let hints = match state.mode() {
        CalcMode::Standard => "Tab AI mode | Ctrl+C quit ",
        CalcMode::Ai => "Tab standard | F2 history | Ctrl+L clear | Ctrl+C quit ",
    };

    let used = left.content.width();
    let pad = usize::from(area.width).saturating_sub(used + hints.width());

    let line = Line::from(vec![
        left,
        Span::raw(" ".repeat(pad)),
        Span::styled(hints, Style::default().fg(theme::DIM_GRAY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
