//! Ordering for dotted hierarchical identifiers such as `bv-12.3.10`.

use std::cmp::Ordering;

/// Total order over dotted identifiers.
///
/// The first segment compares as a plain string. Later segments compare
/// numerically when both parse as integers (`9 < 10`) and as strings
/// otherwise. A prefix sorts before its extensions, so parents precede their
/// children. Ids that tie segment-wise (`x.01` vs `x.1`) fall back to plain
/// string order so the result stays consistent with equality.
#[must_use]
pub fn compare_hierarchical_ids(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut left = a.split('.');
    let mut right = b.split('.');

    // Base segment: plain string comparison.
    match (left.next(), right.next()) {
        (Some(l), Some(r)) => {
            let ord = l.cmp(r);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        _ => return a.cmp(b),
    }

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = compare_segment(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn compare_segment(l: &str, r: &str) -> Ordering {
    match (l.parse::<i64>(), r.parse::<i64>()) {
        (Ok(ln), Ok(rn)) => ln.cmp(&rn),
        _ => l.cmp(r),
    }
}

#[cfg(test)]
mod tests {
    use super::compare_hierarchical_ids as cmp;
    use std::cmp::Ordering;

    #[test]
    fn equal_ids_compare_equal() {
        assert_eq!(cmp("bv-1.2", "bv-1.2"), Ordering::Equal);
    }

    #[test]
    fn base_segment_is_plain_string_order() {
        assert_eq!(cmp("bv-10", "bv-9"), Ordering::Less);
        assert_eq!(cmp("abc", "abd.1"), Ordering::Less);
    }

    #[test]
    fn child_segments_compare_numerically() {
        assert_eq!(cmp("x.9", "x.10"), Ordering::Less);
        assert_eq!(cmp("x.10", "x.9"), Ordering::Greater);
        assert_eq!(cmp("bv-1.2.10", "bv-1.2.3"), Ordering::Greater);
    }

    #[test]
    fn non_numeric_segments_compare_as_strings() {
        assert_eq!(cmp("x.a", "x.b"), Ordering::Less);
        assert_eq!(cmp("x.10", "x.a"), Ordering::Less);
    }

    #[test]
    fn parent_sorts_before_children() {
        assert_eq!(cmp("bv-1", "bv-1.1"), Ordering::Less);
        assert_eq!(cmp("bv-1.1.1", "bv-1.1"), Ordering::Greater);
    }

    #[test]
    fn numeric_ties_fall_back_to_string_order() {
        assert_eq!(cmp("x.01", "x.1"), Ordering::Less);
        assert_eq!(cmp("x.1", "x.01"), Ordering::Greater);
    }
}
