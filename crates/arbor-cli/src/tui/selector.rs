//! Label/epic/bead selector overlay.
//!
//! The overlay is modal. In `Normal` mode single keys navigate and switch
//! modes; in `Insert` mode printable keys edit the query. Which candidate
//! source the query runs against depends on the insert variant:
//!
//! - `Search`: fuzzy match over the catalogue (or the scope candidates while
//!   a scope is active).
//! - `ScopeAdd`: same matching; Enter on a label narrows the scope instead of
//!   confirming.
//! - `ReviewLookup`: id-prefix/title lookup over every item.

use super::text::{truncate, with_cursor};
use arbor_core::fuzzy::{FuzzyMatcher, SubsequenceMatcher};
use arbor_core::model::Item;
use arbor_core::scope::ScopeFilter;
use arbor_core::selector::{SelectorItem, SelectorKind, build_catalogue, fuzzy_filter, lookup_by_id};
use arbor_core::viewport::{clamp_cursor, ensure_visible};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    Search,
    ScopeAdd,
    ReviewLookup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorMode {
    #[default]
    Normal,
    Insert(InsertKind),
}

/// How the overlay ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorOutcome {
    Confirmed {
        item: SelectorItem,
        /// Scope labels plus the chosen label, when a label was chosen under
        /// an active scope. Empty otherwise.
        scoped_labels: Vec<String>,
    },
    Cancelled,
}

pub struct SelectorState {
    mode: SelectorMode,
    query: String,
    catalogue: Vec<SelectorItem>,
    candidates: Vec<SelectorItem>,
    scope: ScopeFilter,
    cursor: usize,
    scroll: usize,
    matcher: Box<dyn FuzzyMatcher>,
}

impl Default for SelectorState {
    fn default() -> Self {
        Self::with_matcher(Box::new(SubsequenceMatcher))
    }
}

impl SelectorState {
    pub fn with_matcher(matcher: Box<dyn FuzzyMatcher>) -> Self {
        Self {
            mode: SelectorMode::Normal,
            query: String::new(),
            catalogue: Vec::new(),
            candidates: Vec::new(),
            scope: ScopeFilter::new(),
            cursor: 0,
            scroll: 0,
            matcher,
        }
    }

    /// Rebuild the catalogue from `items` and start fresh.
    pub fn open(&mut self, items: &[Item]) {
        self.catalogue = build_catalogue(items);
        self.reset();
    }

    /// Return to the initial state, keeping the catalogue.
    pub fn reset(&mut self) {
        self.mode = SelectorMode::Normal;
        self.query.clear();
        self.candidates = self.scope.clear(&self.catalogue);
        self.cursor = 0;
        self.scroll = 0;
    }

    pub const fn mode(&self) -> SelectorMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn candidates(&self) -> &[SelectorItem] {
        &self.candidates
    }

    pub fn scope_labels(&self) -> &[String] {
        self.scope.labels()
    }

    pub fn selected(&self) -> Option<&SelectorItem> {
        self.candidates.get(self.cursor)
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Feed one key. Returns an outcome when the overlay should close.
    pub fn handle_key(&mut self, key: KeyEvent, items: &[Item]) -> Option<SelectorOutcome> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(SelectorOutcome::Cancelled);
        }
        match self.mode {
            SelectorMode::Normal => self.handle_normal_key(key, items),
            SelectorMode::Insert(kind) => self.handle_insert_key(kind, key, items),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent, items: &[Item]) -> Option<SelectorOutcome> {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('i' | '/') => self.mode = SelectorMode::Insert(InsertKind::Search),
            KeyCode::Char('s') => self.mode = SelectorMode::Insert(InsertKind::ScopeAdd),
            KeyCode::Char('r') => {
                self.mode = SelectorMode::Insert(InsertKind::ReviewLookup);
                self.query.clear();
                self.candidates.clear();
                self.cursor = 0;
                self.scroll = 0;
            }
            KeyCode::Enter => return self.confirm(),
            KeyCode::Esc => {
                if self.scope.is_active() {
                    self.scope.clear(&self.catalogue);
                    self.query.clear();
                    self.refilter(items);
                } else {
                    return Some(SelectorOutcome::Cancelled);
                }
            }
            KeyCode::Backspace => {
                if !self.query.is_empty() {
                    self.query.clear();
                    self.refilter(items);
                } else if self.scope.is_active() {
                    self.scope.remove_last(items, &self.catalogue);
                    self.refilter(items);
                }
            }
            _ => {}
        }
        None
    }

    fn handle_insert_key(
        &mut self,
        kind: InsertKind,
        key: KeyEvent,
        items: &[Item],
    ) -> Option<SelectorOutcome> {
        match key.code {
            KeyCode::Esc => {
                self.mode = SelectorMode::Normal;
                if kind == InsertKind::ReviewLookup {
                    self.query.clear();
                    self.refilter(items);
                }
            }
            KeyCode::Enter => {
                let scope_label = kind == InsertKind::ScopeAdd
                    && self.selected().is_some_and(SelectorItem::is_label);
                if scope_label {
                    if let Some(label) = self.selected().map(|item| item.value.clone()) {
                        self.scope.add(&label, items, &self.catalogue);
                        self.query.clear();
                        self.refilter(items);
                    }
                } else {
                    return self.confirm();
                }
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.refilter(items);
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(c);
                self.refilter(items);
            }
            _ => {}
        }
        None
    }

    fn confirm(&self) -> Option<SelectorOutcome> {
        let item = self.selected()?.clone();
        let scoped_labels = if self.scope.is_active() && item.is_label() {
            let mut labels = self.scope.labels().to_vec();
            if !labels.contains(&item.value) {
                labels.push(item.value.clone());
            }
            labels
        } else {
            Vec::new()
        };
        Some(SelectorOutcome::Confirmed {
            item,
            scoped_labels,
        })
    }

    fn refilter(&mut self, items: &[Item]) {
        self.candidates = if self.mode == SelectorMode::Insert(InsertKind::ReviewLookup) {
            lookup_by_id(&self.query, items)
        } else {
            let base = self.scope.candidates(items, &self.catalogue);
            fuzzy_filter(&self.query, &base, self.matcher.as_ref())
        };
        self.cursor = 0;
        self.scroll = 0;
    }

    const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        self.cursor = clamp_cursor(self.cursor + 1, self.candidates.len());
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

const fn kind_color(kind: SelectorKind) -> Color {
    match kind {
        SelectorKind::Epic => Color::Magenta,
        SelectorKind::Label => Color::Yellow,
        SelectorKind::Bead => Color::Cyan,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn candidate_line(item: &SelectorItem, width: usize, selected: bool) -> Line<'static> {
    let stats = match item.kind {
        SelectorKind::Epic => format!(
            "{}/{} {:>3}%",
            item.closed_count,
            item.issue_count,
            (item.progress * 100.0).round() as u32
        ),
        SelectorKind::Label if item.overlap_count > 0 => format!("∩ {}", item.overlap_count),
        SelectorKind::Label => format!("{} issues", item.issue_count),
        SelectorKind::Bead => item.value.clone(),
    };
    let tag = format!("{:<6}", item.kind.as_str());
    let title_width = width.saturating_sub(tag.len() + stats.chars().count() + 3);
    let title = truncate(&item.title, title_width);
    let pad = title_width.saturating_sub(title.chars().count());

    let title_style = if selected {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let mut line = Line::from(vec![
        Span::styled(tag, Style::default().fg(kind_color(item.kind))),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" ".repeat(pad + 2)),
        Span::styled(stats, Style::default().fg(Color::DarkGray)),
    ]);
    if selected {
        line = line.style(Style::default().bg(Color::DarkGray));
    }
    line
}

fn footer_hints(mode: SelectorMode) -> Vec<(&'static str, &'static str)> {
    match mode {
        SelectorMode::Normal => vec![
            ("j/k", "move"),
            ("/", "search"),
            ("s", "scope"),
            ("r", "review id"),
            ("enter", "select"),
            ("bksp", "pop"),
            ("esc", "back"),
        ],
        SelectorMode::Insert(InsertKind::ScopeAdd) => {
            vec![("enter", "add to scope"), ("↑/↓", "move"), ("esc", "done")]
        }
        SelectorMode::Insert(_) => vec![("enter", "select"), ("↑/↓", "move"), ("esc", "normal")],
    }
}

pub fn render_selector(frame: &mut ratatui::Frame<'_>, state: &mut SelectorState, area: Rect) {
    let popup_w = area.width.saturating_sub(8).min(80);
    let popup_h = area.height.saturating_sub(4).min(24);
    let x = area.x + area.width.saturating_sub(popup_w) / 2;
    let y = area.y + area.height.saturating_sub(popup_h) / 2;
    let popup = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup);
    let title = match state.mode {
        SelectorMode::Normal => " Select ",
        SelectorMode::Insert(InsertKind::Search) => " Select · search ",
        SelectorMode::Insert(InsertKind::ScopeAdd) => " Select · scope ",
        SelectorMode::Insert(InsertKind::ReviewLookup) => " Select · review id ",
    };
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
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let query = if matches!(state.mode, SelectorMode::Insert(_)) {
        with_cursor(&state.query, state.query.chars().count())
    } else {
        state.query.clone()
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(query, Style::default().fg(Color::White)),
        ])),
        chunks[0],
    );

    let scope_line = if state.scope.is_active() {
        Line::from(vec![
            Span::styled("scope: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.scope.labels().join(" ∩ "), Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(Span::styled(
            format!("{} candidates", state.candidates.len()),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(scope_line), chunks[1]);

    let list_area = chunks[2];
    let height = usize::from(list_area.height);
    state.scroll = ensure_visible(state.cursor, state.scroll, state.candidates.len(), height);
    let width = usize::from(list_area.width);
    let lines: Vec<Line<'static>> = if state.candidates.is_empty() {
        let hint = if state.mode == SelectorMode::Insert(InsertKind::ReviewLookup)
            && state.query.is_empty()
        {
            "Type an id or title to look up an issue"
        } else {
            "No matches"
        };
        vec![Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))]
    } else {
        state
            .candidates
            .iter()
            .enumerate()
            .skip(state.scroll)
            .take(height)
            .map(|(idx, item)| candidate_line(item, width, idx == state.cursor))
            .collect()
    };
    frame.render_widget(Paragraph::new(lines), list_area);

    let mut spans = Vec::new();
    for (key, desc) in footer_hints(state.mode) {
        spans.push(Span::styled(key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(format!(" {desc}  "), Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[3]);
}
