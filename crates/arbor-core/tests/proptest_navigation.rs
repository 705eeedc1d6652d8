use arbor_core::hierarchy::compare_hierarchical_ids as cmp;
use arbor_core::model::Item;
use arbor_core::tree::flatten;
use arbor_core::viewport::{clamp_cursor, ensure_visible};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[path = "generators.rs"]
mod generators;
use generators::*;

/// Ids reachable from `root` through parent-child edges, root included.
fn reachable(items: &[Item], root: &str) -> HashSet<String> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for item in items {
        for parent in item.parent_ids() {
            children.entry(parent).or_default().push(item.id.as_str());
        }
    }
    let mut seen = HashSet::from([root.to_string()]);
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        for kid in children.get(id).into_iter().flatten() {
            if seen.insert((*kid).to_string()) {
                stack.push(kid);
            }
        }
    }
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    // Comparator

    #[test]
    fn comparator_is_reflexive(a in arb_hier_id()) {
        prop_assert_eq!(cmp(&a, &a), Ordering::Equal);
    }

    #[test]
    fn comparator_is_antisymmetric(a in arb_hier_id(), b in arb_hier_id()) {
        prop_assert_eq!(cmp(&a, &b), cmp(&b, &a).reverse());
        if cmp(&a, &b) == Ordering::Equal {
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn comparator_is_transitive(a in arb_hier_id(), b in arb_hier_id(), c in arb_hier_id()) {
        let mut ids = [a, b, c];
        ids.sort_by(|x, y| cmp(x, y));
        prop_assert_ne!(cmp(&ids[0], &ids[1]), Ordering::Greater);
        prop_assert_ne!(cmp(&ids[1], &ids[2]), Ordering::Greater);
        prop_assert_ne!(cmp(&ids[0], &ids[2]), Ordering::Greater);
    }

    #[test]
    fn parent_sorts_before_child(a in arb_hier_id(), n in 0u32..50) {
        let child = format!("{a}.{n}");
        prop_assert_eq!(cmp(&a, &child), Ordering::Less);
    }

    // Flattener

    #[test]
    fn flatten_visits_each_reachable_node_once(items in arb_forest(24)) {
        let nodes = flatten(&items, "n-0", |_| true);
        prop_assert!(!nodes.is_empty());
        prop_assert_eq!(&items[nodes[0].index].id, "n-0");
        prop_assert_eq!(nodes[0].depth, 0);

        let emitted: Vec<&str> = nodes.iter().map(|n| items[n.index].id.as_str()).collect();
        let unique: HashSet<&str> = emitted.iter().copied().collect();
        prop_assert_eq!(unique.len(), emitted.len());

        let expected = reachable(&items, "n-0");
        let got: HashSet<String> = unique.into_iter().map(str::to_string).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn flatten_depths_follow_parents(items in arb_forest(24)) {
        let nodes = flatten(&items, "n-0", |_| true);
        let depth: HashMap<&str, usize> = nodes
            .iter()
            .map(|n| (items[n.index].id.as_str(), n.depth))
            .collect();
        for node in nodes.iter().skip(1) {
            let item = &items[node.index];
            let parent = item.parent_ids().next().unwrap();
            prop_assert_eq!(node.depth, depth[parent] + 1);
        }
    }

    #[test]
    fn filtered_flatten_is_a_subsequence(items in arb_forest(24), keep in 0usize..4) {
        let all = flatten(&items, "n-0", |_| true);
        let some = flatten(&items, "n-0", |item| item.id.len() % 4 == keep);
        prop_assert_eq!(some[0].index, all[0].index);
        let mut rest = all.iter().map(|n| n.index);
        for node in &some {
            prop_assert!(rest.any(|index| index == node.index));
        }
    }

    // Viewport

    #[test]
    fn ensure_visible_keeps_cursor_on_screen(
        len in 1usize..200,
        cursor in 0usize..200,
        scroll in 0usize..200,
        height in 1usize..40,
    ) {
        let cursor = clamp_cursor(cursor, len);
        let next = ensure_visible(cursor, scroll, len, height);
        prop_assert!(next <= cursor);
        prop_assert!(cursor < next + height);
        prop_assert!(next <= len.saturating_sub(height));
    }

    #[test]
    fn ensure_visible_is_stable_when_already_visible(
        len in 1usize..200,
        height in 1usize..40,
        offset in 0usize..40,
    ) {
        let scroll = len.saturating_sub(height) / 2;
        let cursor = clamp_cursor(scroll + offset % height, len);
        prop_assert_eq!(ensure_visible(cursor, scroll, len, height), scroll);
    }
}
