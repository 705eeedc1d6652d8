//! Review session tracking.
//!
//! The session owns the ordered action log and live counters. Counters move
//! once per item (on its first transition out of `unreviewed`); the log
//! records every decision so persisted history shows the real sequence.

use crate::error::ArborError;
use crate::model::{Item, ReviewAction, ReviewOutcome, ReviewStatus, ReviewType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Separator placed between successive notes on one item.
pub const NOTE_SEPARATOR: &str = "\n\n---\n\n";

/// Live counters for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub started_at: DateTime<Utc>,
    pub reviewed: usize,
    pub approved: usize,
    pub needs_revision: usize,
    pub deferred: usize,
}

impl SessionStats {
    const fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            reviewed: 0,
            approved: 0,
            needs_revision: 0,
            deferred: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    reviewer: String,
    review_type: ReviewType,
    stats: SessionStats,
    actions: Vec<ReviewAction>,
}

impl ReviewSession {
    #[must_use]
    pub fn new(reviewer: &str, review_type: ReviewType) -> Self {
        Self::started_at(reviewer, review_type, Utc::now())
    }

    #[must_use]
    pub fn started_at(reviewer: &str, review_type: ReviewType, at: DateTime<Utc>) -> Self {
        Self {
            reviewer: reviewer.to_string(),
            review_type,
            stats: SessionStats::new(at),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn reviewer(&self) -> &str {
        &self.reviewer
    }

    #[must_use]
    pub const fn review_type(&self) -> ReviewType {
        self.review_type
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Every recorded action, oldest first.
    #[must_use]
    pub fn actions(&self) -> &[ReviewAction] {
        &self.actions
    }

    /// Actions not yet handed to a saver.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.actions.len()
    }

    /// Find `issue_id` in `items` and record `outcome` against it.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::ItemNotFound`] when no item carries `issue_id`.
    pub fn record(
        &mut self,
        items: &mut [Item],
        issue_id: &str,
        outcome: ReviewOutcome,
        note: &str,
    ) -> Result<ReviewAction, ArborError> {
        let item = items
            .iter_mut()
            .find(|item| item.id == issue_id)
            .ok_or_else(|| ArborError::ItemNotFound(issue_id.to_string()))?;
        Ok(self.record_on(item, outcome, note, Utc::now()))
    }

    /// Apply `outcome` to `item` at time `at` and log it.
    ///
    /// A non-empty note is appended to the item's notes. Status outcomes
    /// overwrite the item's review status, reviewer and timestamp; counters
    /// move only if the item was still unreviewed. `Note` outcomes leave
    /// status and counters alone. The action is always logged, and a copy
    /// of the logged entry is returned.
    pub fn record_on(
        &mut self,
        item: &mut Item,
        outcome: ReviewOutcome,
        note: &str,
        at: DateTime<Utc>,
    ) -> ReviewAction {
        let note = note.trim();
        if !note.is_empty() {
            if item.notes.is_empty() {
                item.notes = note.to_string();
            } else {
                item.notes.push_str(NOTE_SEPARATOR);
                item.notes.push_str(note);
            }
        }

        if let Some(status) = outcome.status() {
            let was_unreviewed = item.review_status == ReviewStatus::Unreviewed;
            item.review_status = status;
            item.reviewed_by = Some(self.reviewer.clone());
            item.reviewed_at = Some(at);

            if was_unreviewed {
                self.stats.reviewed += 1;
                match status {
                    ReviewStatus::Approved => self.stats.approved += 1,
                    ReviewStatus::NeedsRevision => self.stats.needs_revision += 1,
                    ReviewStatus::Deferred => self.stats.deferred += 1,
                    ReviewStatus::Unreviewed => {}
                }
            }
        }

        tracing::debug!(
            issue = %item.id,
            outcome = %outcome,
            reviewed = self.stats.reviewed,
            "recorded review action"
        );

        let action = ReviewAction {
            issue_id: item.id.clone(),
            outcome,
            reviewer: self.reviewer.clone(),
            notes: note.to_string(),
            review_type: self.review_type,
            timestamp: at,
        };
        self.actions.push(action.clone());
        action
    }
}

/// Share of displayed items carrying a review decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub reviewed: usize,
    pub total: usize,
}

impl Progress {
    pub fn of<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut progress = Self::default();
        for item in items {
            progress.total += 1;
            if !item.is_unreviewed() {
                progress.reviewed += 1;
            }
        }
        progress
    }

    /// Whole-number percentage, `0` for an empty set.
    #[must_use]
    pub const fn percent(self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.reviewed * 100 / self.total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 12, minute, 0).unwrap()
    }

    fn session() -> ReviewSession {
        ReviewSession::started_at("ana", ReviewType::Plan, at(0))
    }

    #[test]
    fn first_approval_counts_once() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        s.record_on(&mut item, ReviewOutcome::Approved, "", at(1));
        assert_eq!(s.stats().reviewed, 1);
        assert_eq!(s.stats().approved, 1);
        assert_eq!(item.review_status, ReviewStatus::Approved);
        assert_eq!(item.reviewed_by.as_deref(), Some("ana"));
        assert_eq!(item.reviewed_at, Some(at(1)));
    }

    #[test]
    fn re_review_changes_status_without_double_counting() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        s.record_on(&mut item, ReviewOutcome::Approved, "", at(1));
        s.record_on(&mut item, ReviewOutcome::NeedsRevision, "tests missing", at(2));

        let stats = s.stats();
        assert_eq!(stats.reviewed, 1);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.needs_revision, 0);
        assert_eq!(item.review_status, ReviewStatus::NeedsRevision);
        assert_eq!(item.reviewed_at, Some(at(2)));
        assert_eq!(s.actions().len(), 2);
        assert_eq!(s.actions()[1].outcome, ReviewOutcome::NeedsRevision);
    }

    #[test]
    fn previously_reviewed_item_does_not_count() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        item.review_status = ReviewStatus::Deferred;
        s.record_on(&mut item, ReviewOutcome::Approved, "", at(1));
        assert_eq!(s.stats().reviewed, 0);
        assert_eq!(s.stats().approved, 0);
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn returned_action_matches_logged_entry() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        let action = s.record_on(&mut item, ReviewOutcome::Deferred, "  later  ", at(3));
        assert_eq!(action.issue_id, "bv-1");
        assert_eq!(action.outcome, ReviewOutcome::Deferred);
        assert_eq!(action.notes, "later");
        assert_eq!(action.timestamp, at(3));
        assert_eq!(s.actions(), std::slice::from_ref(&action));
    }

    #[test]
    fn notes_append_with_separator() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        s.record_on(&mut item, ReviewOutcome::Deferred, "first", at(1));
        s.record_on(&mut item, ReviewOutcome::Note, "second", at(2));
        assert_eq!(item.notes, "first\n\n---\n\nsecond");
    }

    #[test]
    fn note_outcome_keeps_status_and_counters() {
        let mut s = session();
        let mut item = Item::new("bv-1", "Root");
        s.record_on(&mut item, ReviewOutcome::Note, "fyi", at(1));
        assert!(item.is_unreviewed());
        assert_eq!(item.reviewed_by, None);
        assert_eq!(s.stats().reviewed, 0);
        assert_eq!(s.actions()[0].notes, "fyi");
    }

    #[test]
    fn record_by_id_reports_missing_items() {
        let mut s = session();
        let mut items = vec![Item::new("bv-1", "Root")];
        assert!(s.record(&mut items, "bv-1", ReviewOutcome::Approved, "").is_ok());
        let err = s
            .record(&mut items, "bv-2", ReviewOutcome::Approved, "")
            .unwrap_err();
        assert!(matches!(err, ArborError::ItemNotFound(_)));
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn progress_counts_reviewed_share() {
        let mut a = Item::new("a", "a");
        a.review_status = ReviewStatus::Approved;
        let b = Item::new("b", "b");
        let c = Item::new("c", "c");
        let progress = Progress::of([&a, &b, &c]);
        assert_eq!(progress, Progress { reviewed: 1, total: 3 });
        assert_eq!(progress.percent(), 33);
        assert_eq!(Progress::default().percent(), 0);
    }
}
