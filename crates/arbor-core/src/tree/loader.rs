//! Build the review tree rooted at one item.

use crate::error::ArborError;
use crate::hierarchy::children_map;
use crate::model::Item;
use std::collections::{HashMap, HashSet, VecDeque};

/// An item, every descendant reachable over `parent-child` edges, and the
/// items outside the tree that block something inside it.
#[derive(Debug, Clone)]
pub struct ReviewTree {
    pub root: Item,
    pub descendants: Vec<Item>,
    pub blockers: Vec<Item>,
}

impl ReviewTree {
    /// Root followed by descendants in breadth-first order.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        std::iter::once(&self.root).chain(self.descendants.iter())
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        1 + self.descendants.len()
    }

    /// Consume the tree, returning `(items, blockers)` with the root first.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Item>, Vec<Item>) {
        let mut items = Vec::with_capacity(1 + self.descendants.len());
        items.push(self.root);
        items.extend(self.descendants);
        (items, self.blockers)
    }
}

/// Collect the tree rooted at `root_id` out of `items`.
///
/// # Errors
///
/// Returns [`ArborError::ItemNotFound`] when no item carries `root_id`.
pub fn load_review_tree(root_id: &str, items: &[Item]) -> Result<ReviewTree, ArborError> {
    let by_id: HashMap<&str, &Item> = items.iter().map(|item| (item.id.as_str(), item)).collect();
    let root = by_id
        .get(root_id)
        .copied()
        .ok_or_else(|| ArborError::ItemNotFound(root_id.to_string()))?;

    let children = children_map(items);
    let mut in_tree: HashSet<&str> = HashSet::from([root_id]);
    let mut descendants = Vec::new();
    let mut queue: VecDeque<&str> = VecDeque::from([root_id]);

    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(current) else {
            continue;
        };
        for kid in kids {
            if !in_tree.insert(kid.as_str()) {
                continue;
            }
            if let Some(child) = by_id.get(kid.as_str()) {
                descendants.push((*child).clone());
                queue.push_back(kid.as_str());
            }
        }
    }

    let mut blockers = Vec::new();
    let mut seen_blockers: HashSet<&str> = HashSet::new();
    for item in std::iter::once(root).chain(descendants.iter()) {
        for blocker_id in item.blocker_ids() {
            if in_tree.contains(blocker_id) || !seen_blockers.insert(blocker_id) {
                continue;
            }
            if let Some(blocker) = by_id.get(blocker_id) {
                blockers.push((*blocker).clone());
            }
        }
    }

    tracing::debug!(
        root = root_id,
        descendants = descendants.len(),
        blockers = blockers.len(),
        "loaded review tree"
    );

    Ok(ReviewTree {
        root: root.clone(),
        descendants,
        blockers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, DependencyType};

    fn blocked_by(mut item: Item, blocker: &str) -> Item {
        let dep = Dependency::new(&item.id, blocker, DependencyType::Blocks);
        item.dependencies.push(dep);
        item
    }

    fn fixture() -> Vec<Item> {
        vec![
            Item::new("bv-1", "Root"),
            Item::new("bv-1.1", "Child").with_parent("bv-1"),
            blocked_by(Item::new("bv-1.1.1", "Grandchild").with_parent("bv-1.1"), "bv-9"),
            blocked_by(Item::new("bv-1.2", "Second").with_parent("bv-1"), "bv-1.1"),
            Item::new("bv-2", "Unrelated"),
            Item::new("bv-9", "External blocker"),
        ]
    }

    #[test]
    fn collects_all_descendants() {
        let tree = load_review_tree("bv-1", &fixture()).unwrap();
        let ids: Vec<_> = tree.all_items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["bv-1", "bv-1.1", "bv-1.2", "bv-1.1.1"]);
        assert_eq!(tree.total_count(), 4);
    }

    #[test]
    fn blockers_are_external_and_deduplicated() {
        let mut items = fixture();
        items.push(blocked_by(Item::new("bv-1.3", "Third").with_parent("bv-1"), "bv-9"));
        let tree = load_review_tree("bv-1", &items).unwrap();
        let ids: Vec<_> = tree.blockers.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["bv-9"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = load_review_tree("bv-404", &fixture()).unwrap_err();
        assert!(matches!(err, ArborError::ItemNotFound(ref id) if id == "bv-404"));
    }

    #[test]
    fn subtree_root_excludes_siblings() {
        let tree = load_review_tree("bv-1.1", &fixture()).unwrap();
        let ids: Vec<_> = tree.all_items().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["bv-1.1", "bv-1.1.1"]);
    }

    #[test]
    fn parent_cycle_does_not_loop() {
        let items = vec![
            Item::new("a", "a").with_parent("b"),
            Item::new("b", "b").with_parent("a"),
        ];
        let tree = load_review_tree("a", &items).unwrap();
        assert_eq!(tree.total_count(), 2);
    }
}
