#![allow(dead_code)]

use arbor_core::model::Item;
use proptest::prelude::*;

/// Dotted ids with a letter base and numeric child segments, some zero-padded.
pub fn arb_hier_id() -> impl Strategy<Value = String> {
    let base = prop::sample::select(vec!["bv-1", "bv-2", "ab-7", "zz"]);
    let segment = (0u32..12, any::<bool>()).prop_map(|(n, pad)| {
        if pad { format!("0{n}") } else { n.to_string() }
    });
    (base, prop::collection::vec(segment, 0..4)).prop_map(|(base, segs)| {
        let mut id = base.to_string();
        for seg in segs {
            id.push('.');
            id.push_str(&seg);
        }
        id
    })
}

/// Up to `max` items `n-0..n-k` in shuffled storage order, where each `n-i`
/// may hang off any `n-j` with `j < i`. `n-0` is always a root.
pub fn arb_forest(max: usize) -> impl Strategy<Value = Vec<Item>> {
    (1..=max)
        .prop_flat_map(|n| {
            let parents: Vec<BoxedStrategy<Option<usize>>> = (0..n)
                .map(|i| {
                    if i == 0 {
                        Just(None).boxed()
                    } else {
                        prop::option::weighted(0.85, 0..i).boxed()
                    }
                })
                .collect();
            (parents, Just(n)).prop_flat_map(|(parents, n)| {
                (Just(parents), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            })
        })
        .prop_map(|(parents, order)| {
            let build = |i: usize| {
                let item = Item::new(&format!("n-{i}"), &format!("node {i}"));
                match parents[i] {
                    Some(p) => item.with_parent(&format!("n-{p}")),
                    None => item,
                }
            };
            order.into_iter().map(build).collect()
        })
}
