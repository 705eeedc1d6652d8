//! Label co-occurrence narrowing ("scope") for the selector.
//!
//! A scope is an ordered list of labels. Items carrying every scope label are
//! in scope; the candidates offered next are the other labels found on those
//! items, ranked by how many in-scope items carry them.

use crate::model::Item;
use crate::selector::{SelectorItem, SelectorKind};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFilter {
    labels: Vec<String>,
}

impl ScopeFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Active scope labels in insertion order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Add `label` to the scope and recompute. Adding a label that is
    /// already present leaves the list unchanged.
    pub fn add(
        &mut self,
        label: &str,
        items: &[Item],
        catalogue: &[SelectorItem],
    ) -> Vec<SelectorItem> {
        if !self.labels.iter().any(|own| own == label) {
            self.labels.push(label.to_string());
        }
        self.candidates(items, catalogue)
    }

    /// Drop the most recently added label and recompute. No-op on an empty
    /// scope, which yields the full catalogue.
    pub fn remove_last(&mut self, items: &[Item], catalogue: &[SelectorItem]) -> Vec<SelectorItem> {
        self.labels.pop();
        self.candidates(items, catalogue)
    }

    /// Forget every scope label and return the full catalogue.
    pub fn clear(&mut self, catalogue: &[SelectorItem]) -> Vec<SelectorItem> {
        self.labels.clear();
        catalogue.to_vec()
    }

    /// Items carrying every scope label.
    pub fn matching_items<'a>(&'a self, items: &'a [Item]) -> impl Iterator<Item = &'a Item> + 'a {
        items.iter().filter(|item| {
            self.labels
                .iter()
                .all(|scope| item.labels.iter().any(|label| label == scope))
        })
    }

    /// How many in-scope items carry each non-scope label.
    #[must_use]
    pub fn overlap_counts(&self, items: &[Item]) -> HashMap<String, usize> {
        let scope: HashSet<&str> = self.labels.iter().map(String::as_str).collect();
        let mut overlap: HashMap<String, usize> = HashMap::new();
        for item in self.matching_items(items) {
            for label in &item.labels {
                if !scope.contains(label.as_str()) {
                    *overlap.entry(label.clone()).or_default() += 1;
                }
            }
        }
        overlap
    }

    /// Current candidate list.
    ///
    /// Without a scope this is the whole catalogue. With one, it is the
    /// catalogue's non-scope labels that co-occur with the scope, carrying
    /// their overlap counts, sorted by overlap descending (stable).
    #[must_use]
    pub fn candidates(&self, items: &[Item], catalogue: &[SelectorItem]) -> Vec<SelectorItem> {
        if self.labels.is_empty() {
            return catalogue.to_vec();
        }

        let overlap = self.overlap_counts(items);
        let mut out: Vec<SelectorItem> = catalogue
            .iter()
            .filter(|entry| entry.kind == SelectorKind::Label)
            .filter(|entry| !self.labels.contains(&entry.value))
            .filter_map(|entry| {
                overlap
                    .get(&entry.value)
                    .copied()
                    .filter(|count| *count > 0)
                    .map(|count| SelectorItem {
                        overlap_count: count,
                        ..entry.clone()
                    })
            })
            .collect();
        out.sort_by(|a, b| b.overlap_count.cmp(&a.overlap_count));

        tracing::debug!(scope = ?self.labels, candidates = out.len(), "recomputed scope");
        out
    }
}
