//! Turn a rooted item tree into an ordered, indented display list.

use crate::hierarchy::compare_hierarchical_ids;
use crate::model::{Item, ParseEnumError, ReviewStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::{fmt, str::FromStr};

const PIPE: &str = "│  ";
const BLANK: &str = "   ";
const BRANCH: &str = "├─ ";
const CORNER: &str = "└─ ";

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Review-status narrowing applied to descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Unreviewed,
    NeedsRevision,
}

impl StatusFilter {
    const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Unreviewed => "unreviewed",
            Self::NeedsRevision => "needs_revision",
        }
    }

    /// all -> unreviewed -> `needs_revision` -> all
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Unreviewed,
            Self::Unreviewed => Self::NeedsRevision,
            Self::NeedsRevision => Self::All,
        }
    }

    #[must_use]
    pub fn matches(self, status: ReviewStatus) -> bool {
        match self {
            Self::All => true,
            Self::Unreviewed => status == ReviewStatus::Unreviewed,
            Self::NeedsRevision => status == ReviewStatus::NeedsRevision,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Self::All),
            "unreviewed" => Ok(Self::Unreviewed),
            "needs_revision" => Ok(Self::NeedsRevision),
            _ => Err(ParseEnumError {
                expected: "status filter",
                got: s.to_string(),
            }),
        }
    }
}

/// The three independent criteria a descendant must satisfy to be shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring over title or id; empty matches everything.
    pub search: String,
    /// Every label here must be present on the item (case-insensitive).
    pub labels: Vec<String>,
}

impl NodeFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status == StatusFilter::All && self.search.is_empty() && self.labels.is_empty()
    }

    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        if !self.status.matches(item.review_status) {
            return false;
        }

        if !self.search.is_empty() {
            let query = self.search.to_lowercase();
            if !item.title.to_lowercase().contains(&query)
                && !item.id.to_lowercase().contains(&query)
            {
                return false;
            }
        }

        self.labels.iter().all(|label| item.has_label(label))
    }

    /// Add a required label unless an equal one (ignoring case) is present.
    ///
    /// Returns `true` when the label set changed.
    pub fn add_label(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty()
            || self
                .labels
                .iter()
                .any(|own| own.to_lowercase() == label.to_lowercase())
        {
            return false;
        }
        self.labels.push(label.to_string());
        true
    }
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// One visible row of the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayNode {
    /// Index into the item slice that was flattened.
    pub index: usize,
    pub depth: usize,
    /// Indentation glyphs drawn before the item.
    pub prefix: String,
    pub is_last: bool,
}

struct Walker<'a, F> {
    items: &'a [Item],
    children: HashMap<&'a str, Vec<usize>>,
    visited: HashSet<usize>,
    /// Children each item actually displays, after cycle and duplicate removal.
    layout: HashMap<usize, Vec<usize>>,
    predicate: F,
    out: Vec<DisplayNode>,
}

impl<F: Fn(&Item) -> bool> Walker<'_, F> {
    /// Assign every reachable item to the first parent that reaches it depth-first.
    fn claim(&mut self, parent: usize) {
        let kids = self
            .children
            .get(self.items[parent].id.as_str())
            .cloned()
            .unwrap_or_default();

        let mut claimed = Vec::with_capacity(kids.len());
        for kid in kids {
            if self.visited.insert(kid) {
                claimed.push(kid);
                self.claim(kid);
            }
        }
        self.layout.insert(parent, claimed);
    }

    /// `path[j]` records whether the ancestor at depth `j` was a last sibling.
    fn emit(&mut self, parent: usize, depth: usize, path: &mut Vec<bool>) {
        let kids = self.layout.get(&parent).cloned().unwrap_or_default();

        let count = kids.len();
        for (pos, kid) in kids.into_iter().enumerate() {
            let is_last = pos + 1 == count;

            let mut prefix = String::new();
            for was_last in path.iter().skip(1) {
                prefix.push_str(if *was_last { BLANK } else { PIPE });
            }
            prefix.push_str(if is_last { CORNER } else { BRANCH });

            if (self.predicate)(&self.items[kid]) {
                self.out.push(DisplayNode {
                    index: kid,
                    depth,
                    prefix,
                    is_last,
                });
            }

            path.push(is_last);
            self.emit(kid, depth + 1, path);
            path.pop();
        }
    }
}

/// Flatten the tree rooted at `root_id` into depth-first pre-order.
///
/// The root is always emitted first at depth 0. Descendants are emitted only
/// when `predicate` accepts them, but traversal always continues into their
/// children. Siblings are ordered by hierarchical id. An unknown root yields
/// an empty list.
pub fn flatten<F>(items: &[Item], root_id: &str, predicate: F) -> Vec<DisplayNode>
where
    F: Fn(&Item) -> bool,
{
    let Some(root) = items.iter().position(|item| item.id == root_id) else {
        return Vec::new();
    };

    let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, item) in items.iter().enumerate() {
        for parent in item.parent_ids() {
            children.entry(parent).or_default().push(index);
        }
    }
    for kids in children.values_mut() {
        kids.sort_by(|a, b| compare_hierarchical_ids(&items[*a].id, &items[*b].id));
        kids.dedup();
    }

    let mut walker = Walker {
        items,
        children,
        visited: HashSet::from([root]),
        layout: HashMap::new(),
        predicate,
        out: vec![DisplayNode {
            index: root,
            depth: 0,
            prefix: String::new(),
            is_last: true,
        }],
    };
    walker.claim(root);
    walker.emit(root, 1, &mut vec![true]);

    tracing::debug!(root = root_id, nodes = walker.out.len(), "flattened tree");
    walker.out
}

/// Convenience wrapper applying a [`NodeFilter`].
#[must_use]
pub fn flatten_filtered(items: &[Item], root_id: &str, filter: &NodeFilter) -> Vec<DisplayNode> {
    flatten(items, root_id, |item| filter.matches(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn ids<'a>(items: &'a [Item], nodes: &[DisplayNode]) -> Vec<&'a str> {
        nodes.iter().map(|n| items[n.index].id.as_str()).collect()
    }

    fn prefixes(nodes: &[DisplayNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.prefix.as_str()).collect()
    }

    fn reviewed(mut item: Item, status: ReviewStatus) -> Item {
        item.review_status = status;
        item
    }

    fn tree() -> Vec<Item> {
        vec![
            Item::new("r", "Root"),
            Item::new("r.1", "Parser").with_parent("r"),
            Item::new("r.1.1", "Lexer").with_parent("r.1"),
            Item::new("r.1.2", "Grammar").with_parent("r.1"),
            Item::new("r.2", "Codegen").with_parent("r"),
            Item::new("r.2.1", "Emit").with_parent("r.2"),
        ]
    }

    // -----------------------------------------------------------------------
    // Shape
    // -----------------------------------------------------------------------

    #[test]
    fn two_item_tree_uses_corner_glyph() {
        let items = vec![
            Item::new("bv-1", "Root"),
            Item::new("bv-1.1", "Child")
                .with_parent("bv-1")
                .with_status(Status::Blocked),
        ];
        let nodes = flatten_filtered(&items, "bv-1", &NodeFilter::default());
        assert_eq!(ids(&items, &nodes), vec!["bv-1", "bv-1.1"]);
        assert_eq!(nodes[1].prefix, "└─ ");
        assert!(nodes[1].is_last);
    }

    #[test]
    fn prefixes_follow_ancestor_last_state() {
        let items = tree();
        let nodes = flatten_filtered(&items, "r", &NodeFilter::default());
        assert_eq!(
            ids(&items, &nodes),
            vec!["r", "r.1", "r.1.1", "r.1.2", "r.2", "r.2.1"]
        );
        assert_eq!(
            prefixes(&nodes),
            vec!["", "├─ ", "│  ├─ ", "│  └─ ", "└─ ", "   └─ "]
        );
        let depths: Vec<_> = nodes.iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 2, 1, 2]);
    }

    #[test]
    fn siblings_are_ordered_numerically() {
        let items = vec![
            Item::new("r", "Root"),
            Item::new("r.10", "ten").with_parent("r"),
            Item::new("r.9", "nine").with_parent("r"),
        ];
        let nodes = flatten_filtered(&items, "r", &NodeFilter::default());
        assert_eq!(ids(&items, &nodes), vec!["r", "r.9", "r.10"]);
    }

    #[test]
    fn unknown_root_is_empty() {
        assert!(flatten_filtered(&tree(), "nope", &NodeFilter::default()).is_empty());
    }

    #[test]
    fn cyclic_links_emit_each_item_once() {
        let items = vec![
            Item::new("a", "a").with_parent("b"),
            Item::new("b", "b").with_parent("a"),
        ];
        let nodes = flatten_filtered(&items, "a", &NodeFilter::default());
        assert_eq!(ids(&items, &nodes), vec!["a", "b"]);
    }

    #[test]
    fn shared_child_does_not_count_as_a_sibling_twice() {
        let items = vec![
            Item::new("r", "Root"),
            Item::new("r.1", "First").with_parent("r"),
            Item::new("r.2", "Shared").with_parent("r").with_parent("r.1"),
        ];
        let nodes = flatten_filtered(&items, "r", &NodeFilter::default());
        assert_eq!(ids(&items, &nodes), vec!["r", "r.1", "r.2"]);
        assert_eq!(prefixes(&nodes), vec!["", "└─ ", "   └─ "]);
        assert!(nodes[1].is_last);
        assert_eq!(nodes[2].depth, 2);
    }

    // -----------------------------------------------------------------------
    // Filtering
    // -----------------------------------------------------------------------

    #[test]
    fn root_survives_needs_revision_filter() {
        let items = vec![
            Item::new("bv-1", "Root"),
            Item::new("bv-1.1", "Child").with_parent("bv-1"),
        ];
        let filter = NodeFilter {
            status: StatusFilter::NeedsRevision,
            ..NodeFilter::default()
        };
        let nodes = flatten_filtered(&items, "bv-1", &filter);
        assert_eq!(ids(&items, &nodes), vec!["bv-1"]);
    }

    #[test]
    fn filtered_out_parent_still_reveals_children() {
        let mut items = tree();
        items[5] = reviewed(items[5].clone(), ReviewStatus::NeedsRevision);
        let filter = NodeFilter {
            status: StatusFilter::NeedsRevision,
            ..NodeFilter::default()
        };
        let nodes = flatten_filtered(&items, "r", &filter);
        assert_eq!(ids(&items, &nodes), vec!["r", "r.2.1"]);
        assert_eq!(nodes[1].prefix, "   └─ ");
    }

    #[test]
    fn unreviewed_filter_hides_reviewed_items() {
        let mut items = tree();
        items[1] = reviewed(items[1].clone(), ReviewStatus::Approved);
        let filter = NodeFilter {
            status: StatusFilter::Unreviewed,
            ..NodeFilter::default()
        };
        let nodes = flatten_filtered(&items, "r", &filter);
        assert!(!ids(&items, &nodes).contains(&"r.1"));
        assert_eq!(nodes.len(), 5);
    }

    #[test]
    fn search_matches_title_or_id_ignoring_case() {
        let items = tree();
        let filter = NodeFilter {
            search: "LEX".to_string(),
            ..NodeFilter::default()
        };
        assert_eq!(
            ids(&items, &flatten_filtered(&items, "r", &filter)),
            vec!["r", "r.1.1"]
        );

        let by_id = NodeFilter {
            search: "r.2".to_string(),
            ..NodeFilter::default()
        };
        assert_eq!(
            ids(&items, &flatten_filtered(&items, "r", &by_id)),
            vec!["r", "r.2", "r.2.1"]
        );
    }

    #[test]
    fn labels_require_all_active_labels() {
        let mut items = tree();
        items[1] = items[1].clone().with_labels(&["Backend", "urgent"]);
        items[4] = items[4].clone().with_labels(&["backend"]);
        let filter = NodeFilter {
            labels: vec!["backend".to_string(), "URGENT".to_string()],
            ..NodeFilter::default()
        };
        assert_eq!(
            ids(&items, &flatten_filtered(&items, "r", &filter)),
            vec!["r", "r.1"]
        );
    }

    #[test]
    fn add_label_ignores_case_duplicates() {
        let mut filter = NodeFilter::default();
        assert!(filter.add_label("Backend"));
        assert!(!filter.add_label("backend"));
        assert!(!filter.add_label("  "));
        assert_eq!(filter.labels, vec!["Backend"]);
    }

    #[test]
    fn status_filter_cycles_and_parses() {
        assert_eq!(StatusFilter::All.next(), StatusFilter::Unreviewed);
        assert_eq!(StatusFilter::NeedsRevision.next(), StatusFilter::All);
        assert_eq!(
            "needs-revision".parse::<StatusFilter>().unwrap(),
            StatusFilter::NeedsRevision
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }
}
