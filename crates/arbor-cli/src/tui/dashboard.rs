//! Review dashboard for one issue tree.
//!
//! Provides a full-screen view with:
//! - Indented tree of the root and its descendants, filtered by review status,
//!   search text and required labels
//! - Right-side detail pane for the selected issue
//! - Review actions (approve, revision, defer, note) recorded in a session
//! - Session summary with save/discard and prompt export to the clipboard

use super::note::{NoteAction, NoteMode, NoteModalState, render_note_modal};
use super::selector::{SelectorOutcome, SelectorState, render_selector};
use super::text::{truncate, with_cursor};
use crate::clipboard::Clipboard;
use arbor_core::model::{Item, ReviewOutcome, ReviewStatus, ReviewSummary, ReviewType, Status};
use arbor_core::persist::{ReviewSaver, SaveResult};
use arbor_core::prompt::{full_prompt, simple_prompt};
use arbor_core::selector::SelectorKind;
use arbor_core::session::{Progress, ReviewSession};
use arbor_core::tree::{DisplayNode, NodeFilter, ReviewTree, flatten_filtered};
use arbor_core::viewport::{clamp_cursor, ensure_visible};
use chrono::{Local, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::{Duration, Instant};
use tracing::warn;

const STATUS_MSG_TTL: Duration = Duration::from_secs(3);
const COPIED_TTL: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// At most one overlay captures keys at a time.
#[derive(Debug, Clone, Default)]
enum Overlay {
    #[default]
    None,
    Search,
    LabelInput,
    AssigneeInput,
    Note(NoteModalState),
    Help,
    Summary,
    Selector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Tree,
    Detail,
}

/// Settings resolved from config and command-line flags.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub reviewer: String,
    pub review_type: ReviewType,
    pub split_percent: u16,
    pub show_detail: bool,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            reviewer: "reviewer".to_string(),
            review_type: ReviewType::Plan,
            split_percent: 45,
            show_detail: true,
        }
    }
}

pub struct Dashboard {
    root_id: String,
    /// Root first, then descendants.
    items: Vec<Item>,
    /// Issues outside the tree that block something inside it.
    blockers: Vec<Item>,
    nodes: Vec<DisplayNode>,
    filter: NodeFilter,
    cursor: usize,
    scroll: usize,
    list_height: usize,
    detail_scroll: u16,
    focus: Focus,
    overlay: Overlay,
    /// Text buffer shared by the single-line inputs.
    input: String,
    session: ReviewSession,
    selector: SelectorState,
    clipboard: Box<dyn Clipboard>,
    saver: Option<Box<dyn ReviewSaver>>,
    save_result: Option<SaveResult>,
    status_msg: Option<(String, Instant)>,
    copied_at: Option<Instant>,
    split_percent: u16,
    show_detail: bool,
    should_quit: bool,
}

impl Dashboard {
    /// Build a dashboard over `tree`. Without a saver, "save & quit" only quits.
    pub fn new(
        tree: ReviewTree,
        options: DashboardOptions,
        clipboard: Box<dyn Clipboard>,
        saver: Option<Box<dyn ReviewSaver>>,
    ) -> Self {
        let root_id = tree.root.id.clone();
        let (items, blockers) = tree.into_parts();
        let mut dashboard = Self {
            root_id,
            items,
            blockers,
            nodes: Vec::new(),
            filter: NodeFilter::default(),
            cursor: 0,
            scroll: 0,
            list_height: 20,
            detail_scroll: 0,
            focus: Focus::Tree,
            overlay: Overlay::None,
            input: String::new(),
            session: ReviewSession::new(&options.reviewer, options.review_type),
            selector: SelectorState::default(),
            clipboard,
            saver,
            save_result: None,
            status_msg: None,
            copied_at: None,
            split_percent: options.split_percent.clamp(20, 80),
            show_detail: options.show_detail,
            should_quit: false,
        };
        dashboard.rebuild();
        dashboard
    }

    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub const fn session(&self) -> &ReviewSession {
        &self.session
    }

    /// Result of the last save attempt, if any.
    pub const fn save_result(&self) -> Option<&SaveResult> {
        self.save_result.as_ref()
    }

    fn selected_item(&self) -> Option<&Item> {
        self.nodes
            .get(self.cursor)
            .and_then(|node| self.items.get(node.index))
    }

    fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    // -----------------------------------------------------------------------
    // Tree and cursor
    // -----------------------------------------------------------------------

    fn rebuild(&mut self) {
        self.nodes = flatten_filtered(&self.items, &self.root_id, &self.filter);
        self.cursor = clamp_cursor(self.cursor, self.nodes.len());
        self.scroll = ensure_visible(self.cursor, self.scroll, self.nodes.len(), self.list_height);
    }

    /// Rebuild after a filter edit and jump back to the top.
    fn refilter(&mut self) {
        self.cursor = 0;
        self.scroll = 0;
        self.rebuild();
    }

    fn move_cursor_to(&mut self, cursor: usize) {
        self.cursor = clamp_cursor(cursor, self.nodes.len());
        self.scroll = ensure_visible(self.cursor, self.scroll, self.nodes.len(), self.list_height);
        self.detail_scroll = 0;
    }

    /// Next (or previous) unreviewed row after the cursor, wrapping around.
    fn find_unreviewed(&self, forward: bool) -> Option<usize> {
        let len = self.nodes.len();
        (1..len)
            .map(|step| {
                if forward {
                    (self.cursor + step) % len
                } else {
                    (self.cursor + len - step) % len
                }
            })
            .find(|&idx| self.items[self.nodes[idx].index].is_unreviewed())
    }

    fn jump_unreviewed(&mut self, forward: bool) {
        match self.find_unreviewed(forward) {
            Some(idx) => self.move_cursor_to(idx),
            None => self.set_status("No other unreviewed issues".to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Review actions
    // -----------------------------------------------------------------------

    fn record(&mut self, issue_id: &str, outcome: ReviewOutcome, note: &str) {
        let msg = match self
            .session
            .record(&mut self.items, issue_id, outcome, note)
        {
            Ok(action) => format!("{} {issue_id} → {}", action.outcome.glyph(), action.outcome),
            Err(e) => format!("Error: {e}"),
        };
        self.set_status(msg);
        self.rebuild();
    }

    fn open_note(&mut self, mode: NoteMode) {
        if let Some(id) = self.selected_item().map(|item| item.id.clone()) {
            self.overlay = Overlay::Note(NoteModalState::new(mode, &id));
        }
    }

    fn copy_prompt(&mut self, full: bool) {
        let text = if full {
            let items = &self.items;
            full_prompt(self.session.actions(), |id| {
                items
                    .iter()
                    .find(|item| item.id == id)
                    .map(|item| item.title.clone())
            })
        } else {
            simple_prompt(self.session.actions())
        };
        match self.clipboard.write_all(&text) {
            Ok(()) => self.copied_at = Some(Instant::now()),
            Err(e) => warn!(error = %e, "could not copy prompt"),
        }
    }

    fn save_and_quit(&mut self) {
        let Some(saver) = self.saver.as_mut() else {
            self.should_quit = true;
            return;
        };
        let result = saver.save(self.session.actions());
        let nothing_saved = result.saved == 0 && result.failed > 0;
        self.save_result = Some(result);
        if nothing_saved {
            self.set_status("Save failed. Press q to retry or Q to discard".to_string());
        } else {
            self.should_quit = true;
        }
    }

    // -----------------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.overlay {
            Overlay::None => self.handle_normal_key(key),
            Overlay::Search => self.handle_search_key(key),
            Overlay::LabelInput => self.handle_label_key(key),
            Overlay::AssigneeInput => self.handle_assignee_key(key),
            Overlay::Note(_) => self.handle_note_key(key),
            Overlay::Help => self.overlay = Overlay::None,
            Overlay::Summary => self.handle_summary_key(key),
            Overlay::Selector => self.handle_selector_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        let detail_focus = self.focus == Focus::Detail && self.show_detail;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if detail_focus {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else {
                    self.move_cursor_to(self.cursor + 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if detail_focus {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else {
                    self.move_cursor_to(self.cursor.saturating_sub(1));
                }
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.cursor = 0;
                self.scroll = 0;
                self.detail_scroll = 0;
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.move_cursor_to(self.nodes.len().saturating_sub(1));
            }
            KeyCode::Tab => {
                if self.show_detail {
                    self.focus = match self.focus {
                        Focus::Tree => Focus::Detail,
                        Focus::Detail => Focus::Tree,
                    };
                }
            }
            KeyCode::Char(']') => self.jump_unreviewed(true),
            KeyCode::Char('[') => self.jump_unreviewed(false),
            KeyCode::Char('f') => {
                self.filter.status = self.filter.status.next();
                self.rebuild();
                self.set_status(format!("Filter: {}", self.filter.status));
            }
            KeyCode::Char('a') => {
                if let Some(id) = self.selected_item().map(|item| item.id.clone()) {
                    self.record(&id, ReviewOutcome::Approved, "");
                }
            }
            KeyCode::Char('r') => self.open_note(NoteMode::Revision),
            KeyCode::Char('d') => self.open_note(NoteMode::Defer),
            KeyCode::Char('n') => self.open_note(NoteMode::Note),
            KeyCode::Char('A') => {
                let current = self
                    .selected_item()
                    .map(|item| item.assignee.clone().unwrap_or_default());
                if let Some(assignee) = current {
                    self.input = assignee;
                    self.overlay = Overlay::AssigneeInput;
                }
            }
            KeyCode::Char('/') => {
                self.input = self.filter.search.clone();
                self.overlay = Overlay::Search;
            }
            KeyCode::Char('s') => {
                self.input.clear();
                self.overlay = Overlay::LabelInput;
            }
            KeyCode::Char('S') => {
                if !self.filter.labels.is_empty() {
                    self.filter.labels.clear();
                    self.refilter();
                }
            }
            KeyCode::Char('l') => {
                self.selector.open(&self.items);
                self.overlay = Overlay::Selector;
            }
            KeyCode::Char('?') => self.overlay = Overlay::Help,
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.session.pending_count() > 0 {
                    self.overlay = Overlay::Summary;
                } else {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.filter.search.clear();
                self.refilter();
                self.overlay = Overlay::None;
            }
            KeyCode::Enter => self.overlay = Overlay::None,
            KeyCode::Backspace => {
                self.input.pop();
                self.filter.search.clone_from(&self.input);
                self.refilter();
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.filter.search.clone_from(&self.input);
                self.refilter();
            }
            _ => {}
        }
    }

    fn handle_label_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Enter => {
                let label = self.input.trim().to_string();
                if !label.is_empty() && self.filter.add_label(&label) {
                    self.refilter();
                }
                self.input.clear();
                self.overlay = Overlay::None;
            }
            KeyCode::Backspace => {
                if self.input.is_empty() {
                    if self.filter.labels.pop().is_some() {
                        self.refilter();
                    }
                } else {
                    self.input.pop();
                }
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_assignee_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Enter => {
                let assignee = self.input.trim().to_string();
                if let Some(index) = self.nodes.get(self.cursor).map(|node| node.index) {
                    let item = &mut self.items[index];
                    item.assignee = (!assignee.is_empty()).then(|| assignee.clone());
                    item.updated_at = Some(Utc::now());
                    let msg = if assignee.is_empty() {
                        format!("Unassigned {}", item.id)
                    } else {
                        format!("Assigned {} to {assignee}", item.id)
                    };
                    self.set_status(msg);
                }
                self.overlay = Overlay::None;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_note_key(&mut self, key: KeyEvent) {
        let Overlay::Note(modal) = &mut self.overlay else {
            return;
        };
        match modal.handle_key(key) {
            NoteAction::None => {}
            NoteAction::Cancel => self.overlay = Overlay::None,
            NoteAction::Submit => {
                let outcome = modal.mode.outcome();
                let issue_id = modal.issue_id.clone();
                let text = modal.text();
                self.overlay = Overlay::None;
                self.record(&issue_id, outcome, &text);
            }
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.save_and_quit(),
            KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Esc => self.overlay = Overlay::None,
            KeyCode::Char('p') => self.copy_prompt(false),
            KeyCode::Char('P') => self.copy_prompt(true),
            _ => {}
        }
    }

    fn handle_selector_key(&mut self, key: KeyEvent) {
        let Some(outcome) = self.selector.handle_key(key, &self.items) else {
            return;
        };
        self.selector.reset();
        self.overlay = Overlay::None;

        let SelectorOutcome::Confirmed {
            item,
            scoped_labels,
        } = outcome
        else {
            return;
        };
        match item.kind {
            SelectorKind::Label => {
                self.filter.labels = if scoped_labels.is_empty() {
                    vec![item.value]
                } else {
                    scoped_labels
                };
                self.refilter();
                self.set_status(format!("Labels: {}", self.filter.labels.join(", ")));
            }
            SelectorKind::Epic | SelectorKind::Bead => {
                let position = self
                    .nodes
                    .iter()
                    .position(|node| self.items[node.index].id == item.value);
                match position {
                    Some(idx) => self.move_cursor_to(idx),
                    None => self.set_status(format!("{} is not visible in this view", item.value)),
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn render(&mut self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let content = if self.show_detail {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(self.split_percent),
                    Constraint::Percentage(100 - self.split_percent),
                ])
                .split(chunks[0])
        } else {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(100), Constraint::Percentage(0)])
                .split(chunks[0])
        };

        self.list_height = usize::from(content[0].height.saturating_sub(2)).max(1);
        self.scroll = ensure_visible(self.cursor, self.scroll, self.nodes.len(), self.list_height);

        render_tree(frame, self, content[0]);
        if self.show_detail && content[1].width > 0 {
            render_detail(frame, self, content[1]);
        }
        frame.render_widget(
            Paragraph::new(build_status_bar(self, chunks[1].width)).alignment(Alignment::Left),
            chunks[1],
        );

        match &self.overlay {
            Overlay::Note(modal) => render_note_modal(frame, modal, area),
            Overlay::Help => render_help(frame, area),
            Overlay::Summary => render_summary(frame, self, area),
            Overlay::Selector => render_selector(frame, &mut self.selector, area),
            Overlay::None | Overlay::Search | Overlay::LabelInput | Overlay::AssigneeInput => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Render helpers
// ---------------------------------------------------------------------------

const fn review_color(status: ReviewStatus) -> Color {
    match status {
        ReviewStatus::Unreviewed => Color::DarkGray,
        ReviewStatus::Approved => Color::Green,
        ReviewStatus::NeedsRevision => Color::Red,
        ReviewStatus::Deferred => Color::Yellow,
    }
}

const fn status_color(status: Status) -> Color {
    match status {
        Status::Open => Color::White,
        Status::InProgress => Color::Cyan,
        Status::Blocked => Color::Red,
        Status::Closed => Color::DarkGray,
    }
}

fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.saturating_sub(8).min(max_w);
    let h = area.height.saturating_sub(4).min(max_h);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(Style::default().fg(Color::Green))
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
}

fn tree_row(item: &Item, node: &DisplayNode, width: usize, selected: bool) -> Line<'static> {
    let glyph = item.review_status.glyph();
    let used = node.prefix.chars().count() + item.id.chars().count() + 4;
    let title = truncate(&item.title, width.saturating_sub(used));
    let title_style = if item.status.is_closed() {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let mut line = Line::from(vec![
        Span::styled(node.prefix.clone(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            glyph.to_string(),
            Style::default().fg(review_color(item.review_status)),
        ),
        Span::raw(" "),
        Span::styled(item.id.clone(), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(title, title_style),
    ]);
    if selected {
        line.style = Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD);
    }
    line
}

fn render_tree(frame: &mut ratatui::Frame<'_>, app: &Dashboard, area: Rect) {
    let progress = Progress::of(app.nodes.iter().map(|node| &app.items[node.index]));
    let title = match app.overlay {
        Overlay::Search => format!(" arbor · search: {} ", app.input),
        _ => format!(
            " arbor · {} · {}/{} reviewed ({}%) · {} ",
            app.root_id,
            progress.reviewed,
            progress.total,
            progress.percent(),
            app.filter.status
        ),
    };
    let focused = app.focus == Focus::Tree || !app.show_detail;
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(border_style)
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width);
    let lines: Vec<Line<'static>> = app
        .nodes
        .iter()
        .enumerate()
        .skip(app.scroll)
        .take(usize::from(inner.height))
        .map(|(idx, node)| tree_row(&app.items[node.index], node, width, idx == app.cursor))
        .collect();
    if lines.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No issues match the current filters",
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
    } else {
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn push_section(lines: &mut Vec<Line<'static>>, heading: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        heading.to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    for text in body.lines() {
        lines.push(Line::from(text.to_string()));
    }
}

fn detail_lines(item: &Item, blockers: &[&Item]) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            item.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("ID: ", dim),
            Span::styled(item.id.clone(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Type: ", dim),
            Span::raw(item.issue_type.to_string()),
            Span::raw("  "),
            Span::styled("Status: ", dim),
            Span::styled(
                item.status.to_string(),
                Style::default().fg(status_color(item.status)),
            ),
            Span::raw("  "),
            Span::styled("Priority: ", dim),
            Span::raw(format!("P{}", item.priority)),
        ]),
    ];
    if let Some(assignee) = &item.assignee {
        lines.push(Line::from(vec![
            Span::styled("Assignee: ", dim),
            Span::raw(assignee.clone()),
        ]));
    }
    if !item.labels.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Labels: ", dim),
            Span::styled(item.labels.join(", "), Style::default().fg(Color::Yellow)),
        ]));
    }

    let mut review = vec![
        Span::styled("Review: ", dim),
        Span::styled(
            format!("{} {}", item.review_status.glyph(), item.review_status),
            Style::default().fg(review_color(item.review_status)),
        ),
    ];
    if let Some(by) = &item.reviewed_by {
        review.push(Span::styled(format!("  by {by}"), dim));
    }
    if let Some(at) = item.reviewed_at {
        review.push(Span::styled(
            format!("  {}", at.with_timezone(&Local).format("%Y-%m-%d %H:%M")),
            dim,
        ));
    }
    lines.push(Line::from(review));

    if !blockers.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Blocked by",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        for blocker in blockers {
            lines.push(Line::from(vec![
                Span::styled(format!("  {} ", blocker.id), Style::default().fg(Color::Cyan)),
                Span::raw(blocker.title.clone()),
                Span::styled(format!(" ({})", blocker.status), dim),
            ]));
        }
    }

    push_section(&mut lines, "Description", &item.description);
    push_section(&mut lines, "Design", &item.design);
    push_section(&mut lines, "Acceptance Criteria", &item.acceptance_criteria);
    push_section(&mut lines, "Notes", &item.notes);
    lines
}

fn render_detail(frame: &mut ratatui::Frame<'_>, app: &Dashboard, area: Rect) {
    let focused = app.focus == Focus::Detail;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(border::ROUNDED)
        .border_style(if focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title(" Detail ");

    let Some(item) = app.selected_item() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };
    let blockers: Vec<&Item> = app
        .blockers
        .iter()
        .chain(app.items.iter())
        .filter(|other| item.blocker_ids().any(|id| id == other.id))
        .collect();
    frame.render_widget(
        Paragraph::new(detail_lines(item, &blockers))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((app.detail_scroll, 0)),
        area,
    );
}

fn help_sections() -> Vec<(&'static str, Vec<(&'static str, &'static str)>)> {
    vec![
        (
            "Navigation",
            vec![
                ("j/k ↓/↑", "move cursor (scroll detail when focused)"),
                ("g/G", "first/last issue"),
                ("]/[", "next/previous unreviewed"),
                ("Tab", "switch tree/detail focus"),
            ],
        ),
        (
            "Review Actions",
            vec![
                ("a", "approve"),
                ("r", "needs revision (with note)"),
                ("d", "defer (with note)"),
                ("n", "add note"),
                ("A", "set assignee"),
            ],
        ),
        (
            "Filters",
            vec![
                ("f", "cycle all/unreviewed/needs revision"),
                ("/", "search id and title"),
                ("s", "require label (backspace on empty pops)"),
                ("S", "clear labels"),
                ("l", "label/epic/issue selector"),
            ],
        ),
        (
            "Other",
            vec![("?", "this help"), ("q/Esc", "summary or quit")],
        ),
    ]
}

fn render_help(frame: &mut ratatui::Frame<'_>, area: Rect) {
    let popup = centered(area, 64, 26);
    frame.render_widget(Clear, popup);
    let block = modal_block(" Hotkeys ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (heading, keys) in help_sections() {
        lines.push(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, desc) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:10}"), Style::default().fg(Color::Cyan)),
                Span::styled(desc, Style::default().fg(Color::White)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn format_duration(elapsed: chrono::Duration) -> String {
    let secs = elapsed.num_seconds().max(0);
    if secs >= 3600 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

fn render_summary(frame: &mut ratatui::Frame<'_>, app: &Dashboard, area: Rect) {
    let popup = centered(area, 60, 24);
    frame.render_widget(Clear, popup);
    let block = modal_block(" Review Session Summary ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let dim = Style::default().fg(Color::DarkGray);
    let stats = app.session.stats();
    let progress = Progress::of(app.items.iter());
    let totals = ReviewSummary::from_items(&app.items);
    let elapsed = Utc::now() - stats.started_at;

    let mut lines = vec![
        Line::from(vec![Span::styled("Root:      ", dim), Span::raw(app.root_id.clone())]),
        Line::from(vec![
            Span::styled("Reviewer:  ", dim),
            Span::raw(app.session.reviewer().to_string()),
        ]),
        Line::from(vec![
            Span::styled("Duration:  ", dim),
            Span::raw(format_duration(elapsed)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Total:            ", dim),
            Span::raw(stats.reviewed.to_string()),
        ]),
        Line::from(vec![
            Span::styled("✓ Approved:       ", Style::default().fg(Color::Green)),
            Span::raw(stats.approved.to_string()),
        ]),
        Line::from(vec![
            Span::styled("! Needs Revision: ", Style::default().fg(Color::Red)),
            Span::raw(stats.needs_revision.to_string()),
        ]),
        Line::from(vec![
            Span::styled("? Deferred:       ", Style::default().fg(Color::Yellow)),
            Span::raw(stats.deferred.to_string()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Overall Progress: ", dim),
            Span::raw(format!(
                "{}/{} items reviewed ({}%)",
                progress.reviewed,
                progress.total,
                progress.percent()
            )),
        ]),
        Line::from(vec![
            Span::styled("Tree Totals:      ", dim),
            Span::raw(format!(
                "{} {}  {} {}  {} {}  {} {}",
                ReviewStatus::Approved.glyph(),
                totals.approved,
                ReviewStatus::NeedsRevision.glyph(),
                totals.needs_revision,
                ReviewStatus::Deferred.glyph(),
                totals.deferred,
                ReviewStatus::Unreviewed.glyph(),
                totals.unreviewed
            )),
        ]),
        Line::from(vec![
            Span::styled("Approval Rate:    ", dim),
            Span::raw(format!(
                "{:.0}% of reviewed items",
                totals.approval_rate() * 100.0
            )),
        ]),
    ];

    if let Some(result) = &app.save_result {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Saved {}, failed {}", result.saved, result.failed),
            Style::default().fg(Color::Red),
        )));
        for error in &result.errors {
            lines.push(Line::from(Span::styled(format!("  {error}"), dim)));
        }
    }

    if app.copied_at.is_some_and(|at| at.elapsed() < COPIED_TTL) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "✓ Copied to clipboard!",
            Style::default().fg(Color::Green),
        )));
    }

    let save_label = if app.saver.is_some() {
        " save & quit  "
    } else {
        " quit  "
    };
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::styled(save_label, dim),
        Span::styled("Q", Style::default().fg(Color::Cyan)),
        Span::styled(" discard  ", dim),
        Span::styled("esc", Style::default().fg(Color::Cyan)),
        Span::styled(" back  ", dim),
        Span::styled("p/P", Style::default().fg(Color::Cyan)),
        Span::styled(" copy prompt", dim),
    ]));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Build the status bar line from the current overlay and filters.
fn build_status_bar(app: &Dashboard, width: u16) -> Line<'static> {
    let key_style = Style::default().fg(Color::Cyan);
    let val_style = Style::default().fg(Color::Cyan);
    let label_style = Style::default().fg(Color::White);
    let dim_style = Style::default().fg(Color::DarkGray);

    let prompt = match app.overlay {
        Overlay::Search => Some("Search: "),
        Overlay::LabelInput => Some("Label: "),
        Overlay::AssigneeInput => Some("Assignee: "),
        _ => None,
    };
    if let Some(prompt) = prompt {
        let input = with_cursor(&app.input, app.input.chars().count());
        return Line::from(vec![
            Span::styled(prompt, label_style),
            Span::styled(input, Style::default().fg(Color::White)),
            Span::styled("  ENTER", key_style),
            Span::styled(" confirm  ", dim_style),
            Span::styled("ESC", key_style),
            Span::styled(" cancel", dim_style),
        ]);
    }

    if let Some((msg, at)) = &app.status_msg {
        if at.elapsed() < STATUS_MSG_TTL {
            return Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Cyan)));
        }
    }

    let mut spans: Vec<Span<'static>> = Vec::new();
    if !app.filter.is_empty() {
        spans.push(Span::styled("FILTERS: ", label_style));
        spans.push(Span::styled(format!("{} ", app.filter.status), val_style));
        if !app.filter.search.is_empty() {
            spans.push(Span::styled(format!("search={} ", app.filter.search), val_style));
        }
        if !app.filter.labels.is_empty() {
            spans.push(Span::styled(
                format!("labels={} ", app.filter.labels.join("+")),
                val_style,
            ));
        }
        spans.push(Span::styled("  ", dim_style));
    }

    let hints = [
        ("j/k", "nav"),
        ("a", "approve"),
        ("r", "revise"),
        ("d", "defer"),
        ("n", "note"),
        ("f", "filter"),
        ("l", "select"),
        ("?", "help"),
        ("q", "quit"),
    ];
    for (key, desc) in hints {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!(" {desc}  "), dim_style));
    }

    let right = format!(
        "{} · {} actions",
        app.session.reviewer(),
        app.session.pending_count()
    );
    let left_len: usize = spans.iter().map(|span| span.content.chars().count()).sum();
    let right_len = right.chars().count();
    if usize::from(width) > left_len + right_len + 1 {
        spans.push(Span::raw(" ".repeat(usize::from(width) - left_len - right_len)));
    } else {
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(right, dim_style));

    Line::from(spans)
}
