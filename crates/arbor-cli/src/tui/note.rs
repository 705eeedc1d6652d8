//! Multi-line note modal used for notes, revision requests and deferrals.

use super::text::{edit_multiline, with_cursor};
use arbor_core::ReviewOutcome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    None,
    Submit,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteMode {
    Note,
    Revision,
    Defer,
}

impl NoteMode {
    pub const fn outcome(self) -> ReviewOutcome {
        match self {
            Self::Note => ReviewOutcome::Note,
            Self::Revision => ReviewOutcome::NeedsRevision,
            Self::Defer => ReviewOutcome::Deferred,
        }
    }

    const fn title(self) -> (&'static str, &'static str) {
        match self {
            Self::Note => (" Add Note ", "Note is kept without changing review status"),
            Self::Revision => (" Needs Revision ", "Describe what should change (optional)"),
            Self::Defer => (" Defer ", "Why is this deferred? (optional)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteModalState {
    pub mode: NoteMode,
    /// Issue the note will be recorded against.
    pub issue_id: String,
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl NoteModalState {
    pub fn new(mode: NoteMode, issue_id: &str) -> Self {
        Self {
            mode,
            issue_id: issue_id.to_string(),
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }

    /// Plain notes need text; status outcomes may be submitted empty.
    fn can_submit(&self) -> bool {
        self.mode != NoteMode::Note || !self.text().trim().is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> NoteAction {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => NoteAction::Cancel,
            KeyCode::Char('s') | KeyCode::Enter if ctrl => {
                if self.can_submit() {
                    NoteAction::Submit
                } else {
                    NoteAction::None
                }
            }
            _ => {
                edit_multiline(&mut self.lines, &mut self.row, &mut self.col, key);
                NoteAction::None
            }
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn render_note_modal(frame: &mut ratatui::Frame<'_>, modal: &NoteModalState, area: Rect) {
    let modal_width = area.width.saturating_sub(8).min(96);
    let modal_height = area.height.saturating_sub(6).min(16);
    let x = area.x + area.width.saturating_sub(modal_width) / 2;
    let y = area.y + area.height.saturating_sub(modal_height) / 2;
    let modal_area = Rect::new(x, y, modal_width, modal_height);

    frame.render_widget(Clear, modal_area);

    let (title, subtitle) = modal.mode.title();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(modal.issue_id.clone(), Style::default().fg(Color::Cyan)),
            Span::styled(format!("  {subtitle}"), Style::default().fg(Color::DarkGray)),
        ])),
        chunks[0],
    );

    let lines: Vec<Line<'static>> = modal
        .lines
        .iter()
        .enumerate()
        .map(|(row, line)| {
            if row == modal.row {
                Line::from(with_cursor(line, modal.col))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(Color::DarkGray)),
        ),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Ctrl+S", Style::default().fg(Color::Cyan)),
            Span::styled(" submit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Cyan)),
            Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
        ])),
        chunks[2],
    );
}
