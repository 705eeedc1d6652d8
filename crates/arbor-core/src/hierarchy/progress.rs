use crate::model::Item;
use std::collections::{HashMap, HashSet, VecDeque};

/// Descendant counts for an epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpicProgress {
    pub total: usize,
    pub closed: usize,
}

impl EpicProgress {
    /// Closed fraction in `[0, 1]`; an epic without children reads as `0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.closed as f64 / self.total as f64
        }
    }
}

/// Count every descendant of `epic_id` and how many of them are closed.
///
/// Breadth-first over `children`; each id is visited at most once, so
/// cyclic parent links terminate.
#[must_use]
pub fn epic_progress(
    epic_id: &str,
    children: &HashMap<String, Vec<String>>,
    by_id: &HashMap<&str, &Item>,
) -> EpicProgress {
    let mut progress = EpicProgress::default();
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(epic_id);
    let mut queue: VecDeque<&str> = VecDeque::from([epic_id]);

    while let Some(current) = queue.pop_front() {
        let Some(kids) = children.get(current) else {
            continue;
        };
        for kid in kids {
            if !visited.insert(kid.as_str()) {
                continue;
            }
            progress.total += 1;
            if by_id.get(kid.as_str()).is_some_and(|item| item.status.is_closed()) {
                progress.closed += 1;
            }
            queue.push_back(kid.as_str());
        }
    }

    progress
}
