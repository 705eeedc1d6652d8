//! Parent/child structure over items.

pub mod id;
pub mod progress;

pub use id::compare_hierarchical_ids;
pub use progress::{EpicProgress, epic_progress};

use crate::model::Item;
use std::collections::HashMap;

/// Build the parent -> children adjacency from `parent-child` edges.
///
/// Children keep the order in which they appear in `items`.
#[must_use]
pub fn children_map(items: &[Item]) -> HashMap<String, Vec<String>> {
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for item in items {
        for parent in item.parent_ids() {
            children
                .entry(parent.to_string())
                .or_default()
                .push(item.id.clone());
        }
    }
    children
}
