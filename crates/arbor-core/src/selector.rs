//! Candidate catalogue for the label/epic/bead selector.
//!
//! The catalogue lists open epics (with descendant progress) followed by every
//! label (with direct counts). Two search strategies run over it: fuzzy
//! matching for labels and epics, and id-prefix lookup for individual items.

use crate::fuzzy::FuzzyMatcher;
use crate::hierarchy::{children_map, epic_progress};
use crate::model::Item;
use std::collections::{BTreeMap, HashMap};

/// What a selector row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Epic,
    Label,
    Bead,
}

impl SelectorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Epic => "epic",
            Self::Label => "label",
            Self::Bead => "bead",
        }
    }
}

/// One selectable row.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorItem {
    pub kind: SelectorKind,
    /// Label name, or item id for epics and beads.
    pub value: String,
    pub title: String,
    pub issue_count: usize,
    pub closed_count: usize,
    /// Closed fraction in `[0, 1]`.
    pub progress: f64,
    /// Items sharing this label with the current scope; `0` outside scope.
    pub overlap_count: usize,
}

impl SelectorItem {
    fn bead(item: &Item) -> Self {
        Self {
            kind: SelectorKind::Bead,
            value: item.id.clone(),
            title: item.title.clone(),
            issue_count: 1,
            closed_count: usize::from(item.status.is_closed()),
            progress: 0.0,
            overlap_count: 0,
        }
    }

    #[must_use]
    pub fn is_label(&self) -> bool {
        self.kind == SelectorKind::Label
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(closed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        closed as f64 / total as f64
    }
}

/// Build the unfiltered catalogue: open epics first, then labels.
///
/// Epics sort by progress ascending (least finished first), then title.
/// Labels sort alphabetically.
#[must_use]
pub fn build_catalogue(items: &[Item]) -> Vec<SelectorItem> {
    let children = children_map(items);
    let by_id: HashMap<&str, &Item> = items.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut epics: Vec<SelectorItem> = items
        .iter()
        .filter(|item| item.is_epic() && !item.status.is_closed())
        .map(|epic| {
            let progress = epic_progress(&epic.id, &children, &by_id);
            SelectorItem {
                kind: SelectorKind::Epic,
                value: epic.id.clone(),
                title: epic.title.clone(),
                issue_count: progress.total,
                closed_count: progress.closed,
                progress: progress.ratio(),
                overlap_count: 0,
            }
        })
        .collect();
    epics.sort_by(|a, b| {
        a.progress
            .total_cmp(&b.progress)
            .then_with(|| a.title.cmp(&b.title))
    });

    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for item in items {
        for label in &item.labels {
            let entry = counts.entry(label.as_str()).or_default();
            entry.0 += 1;
            if item.status.is_closed() {
                entry.1 += 1;
            }
        }
    }
    let labels = counts.into_iter().map(|(name, (total, closed))| SelectorItem {
        kind: SelectorKind::Label,
        value: name.to_string(),
        title: name.to_string(),
        issue_count: total,
        closed_count: closed,
        progress: ratio(closed, total),
        overlap_count: 0,
    });

    epics.extend(labels);
    epics
}

/// Fuzzy-filter `base` by `query` over `"<title> <value>"`.
///
/// An empty query returns `base` unchanged. Matches keep the matcher's rank
/// within each kind, with epics ahead of everything else.
#[must_use]
pub fn fuzzy_filter(
    query: &str,
    base: &[SelectorItem],
    matcher: &dyn FuzzyMatcher,
) -> Vec<SelectorItem> {
    let query = query.trim();
    if query.is_empty() {
        return base.to_vec();
    }

    let haystacks: Vec<String> = base
        .iter()
        .map(|item| format!("{} {}", item.title, item.value))
        .collect();
    let mut found: Vec<SelectorItem> = matcher
        .find(query, &haystacks)
        .into_iter()
        .filter_map(|m| base.get(m.index).cloned())
        .collect();
    found.sort_by_key(|item| item.kind != SelectorKind::Epic);
    found
}

/// Look items up by id for review.
///
/// Case-insensitive id-prefix matches rank first (sorted by id), then
/// title-substring matches (sorted by title). An empty query matches nothing.
#[must_use]
pub fn lookup_by_id(query: &str, items: &[Item]) -> Vec<SelectorItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut by_id = Vec::new();
    let mut by_title = Vec::new();
    for item in items {
        if item.id.to_lowercase().starts_with(&query) {
            by_id.push(SelectorItem::bead(item));
        } else if item.title.to_lowercase().contains(&query) {
            by_title.push(SelectorItem::bead(item));
        }
    }

    by_id.sort_by(|a, b| a.value.cmp(&b.value));
    by_title.sort_by(|a, b| a.title.cmp(&b.title));
    by_id.extend(by_title);
    by_id
}
