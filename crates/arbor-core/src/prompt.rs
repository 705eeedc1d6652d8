//! Markdown summaries of a session's actions, meant for pasting into an
//! agent conversation.

use crate::model::{ReviewAction, ReviewOutcome};
use std::fmt::Write as _;

/// Returned by both prompt builders when nothing was recorded.
pub const EMPTY_SESSION: &str = "No reviews recorded in this session.";

/// One line per review decision: glyph, id and outcome.
///
/// Notes are not decisions and are left out. A session holding only notes
/// yields [`EMPTY_SESSION`].
#[must_use]
pub fn simple_prompt(actions: &[ReviewAction]) -> String {
    let decisions: Vec<&ReviewAction> = actions
        .iter()
        .filter(|action| action.outcome.status().is_some())
        .collect();
    if decisions.is_empty() {
        return EMPTY_SESSION.to_string();
    }

    let mut out = String::from("# Review Session Summary\n\n");
    let _ = write!(out, "Reviewed {} issues:\n\n", decisions.len());
    for action in decisions {
        let _ = writeln!(
            out,
            "- {} {} → {}",
            action.outcome.glyph(),
            action.issue_id,
            action.outcome
        );
    }
    out
}

/// Detailed prompt grouping actions by outcome, with notes and instructions.
///
/// `title_of` resolves an issue id to its title; unknown ids fall back to the
/// id itself.
#[must_use]
pub fn full_prompt<F>(actions: &[ReviewAction], title_of: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if actions.is_empty() {
        return EMPTY_SESSION.to_string();
    }

    let title = |id: &str| title_of(id).unwrap_or_else(|| id.to_string());
    let with = |outcome: ReviewOutcome| actions.iter().filter(move |a| a.outcome == outcome);

    let approved = with(ReviewOutcome::Approved).count();
    let revision = with(ReviewOutcome::NeedsRevision).count();
    let deferred = with(ReviewOutcome::Deferred).count();
    let notes = with(ReviewOutcome::Note).count();

    let mut out = String::from("# Review Session Summary\n\n");
    out.push_str("You are reviewing an issue tracking session. ");
    out.push_str("Go over the review feedback and suggest changes.\n\n");

    out.push_str("## Session Stats\n");
    let _ = writeln!(out, "- Approved: {approved} issues");
    let _ = writeln!(out, "- Needs Revision: {revision} issues");
    let _ = writeln!(out, "- Deferred: {deferred} issues");
    if notes > 0 {
        let _ = writeln!(out, "- Notes: {notes}");
    }
    out.push('\n');

    if approved > 0 {
        out.push_str("## Approved Issues\n");
        for action in with(ReviewOutcome::Approved) {
            let _ = writeln!(out, "- `{}`: {}", action.issue_id, title(&action.issue_id));
        }
        out.push('\n');
    }

    if revision > 0 {
        out.push_str("## Issues Needing Revision\n");
        for action in with(ReviewOutcome::NeedsRevision) {
            let _ = writeln!(out, "### `{}`: {}", action.issue_id, title(&action.issue_id));
            if !action.notes.is_empty() {
                let _ = writeln!(out, "**Review Notes:** {}", action.notes);
            }
            out.push_str("**Action Required:** Review feedback and suggest implementation changes.\n\n");
        }
    }

    if deferred > 0 {
        out.push_str("## Deferred Issues\n");
        for action in with(ReviewOutcome::Deferred) {
            let _ = writeln!(out, "### `{}`: {}", action.issue_id, title(&action.issue_id));
            if action.notes.is_empty() {
                out.push('\n');
            } else {
                let _ = write!(out, "**Reason:** {}\n\n", action.notes);
            }
        }
    }

    if notes > 0 {
        out.push_str("## Reviewer Notes\n");
        for action in with(ReviewOutcome::Note) {
            let _ = writeln!(out, "- `{}`: {}", action.issue_id, action.notes);
        }
        out.push('\n');
    }

    out.push_str("---\n\n");
    out.push_str("For each issue with review feedback:\n");
    out.push_str("1. Analyze the review notes\n");
    out.push_str("2. Suggest concrete changes based on feedback\n");
    out.push_str("3. Explain current issue state and dependencies\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReviewType;
    use chrono::Utc;

    fn action(id: &str, outcome: ReviewOutcome, notes: &str) -> ReviewAction {
        ReviewAction {
            issue_id: id.to_string(),
            outcome,
            reviewer: "ana".to_string(),
            notes: notes.to_string(),
            review_type: ReviewType::Plan,
            timestamp: Utc::now(),
        }
    }

    fn titles(id: &str) -> Option<String> {
        (id == "bv-1").then(|| "Root work".to_string())
    }

    #[test]
    fn empty_session_has_fixed_message() {
        assert_eq!(simple_prompt(&[]), EMPTY_SESSION);
        assert_eq!(full_prompt(&[], titles), EMPTY_SESSION);
    }

    #[test]
    fn simple_prompt_lists_each_action() {
        let actions = vec![
            action("bv-1", ReviewOutcome::Approved, ""),
            action("bv-1.1", ReviewOutcome::NeedsRevision, "x"),
        ];
        let text = simple_prompt(&actions);
        assert_eq!(
            text,
            "# Review Session Summary\n\nReviewed 2 issues:\n\n\
             - ✓ bv-1 → approved\n- ! bv-1.1 → needs_revision\n"
        );
    }

    #[test]
    fn simple_prompt_leaves_out_notes() {
        let actions = vec![
            action("bv-1", ReviewOutcome::Note, "check naming"),
            action("bv-1.1", ReviewOutcome::Deferred, "later"),
        ];
        let text = simple_prompt(&actions);
        assert!(text.contains("Reviewed 1 issues:"));
        assert!(text.contains("bv-1.1 → deferred"));
        assert!(!text.contains("bv-1 →"));

        let only_notes = vec![action("bv-1", ReviewOutcome::Note, "check naming")];
        assert_eq!(simple_prompt(&only_notes), EMPTY_SESSION);
    }

    #[test]
    fn full_prompt_groups_by_outcome() {
        let actions = vec![
            action("bv-1", ReviewOutcome::Approved, ""),
            action("bv-1.1", ReviewOutcome::NeedsRevision, "add tests"),
            action("bv-1.2", ReviewOutcome::Deferred, "after launch"),
        ];
        let text = full_prompt(&actions, titles);
        assert!(text.contains("- Approved: 1 issues"));
        assert!(text.contains("- `bv-1`: Root work"));
        assert!(text.contains("### `bv-1.1`: bv-1.1\n**Review Notes:** add tests"));
        assert!(text.contains("**Reason:** after launch"));
        assert!(!text.contains("## Reviewer Notes"));
        assert!(text.ends_with("3. Explain current issue state and dependencies\n"));
    }

    #[test]
    fn full_prompt_includes_notes_section_when_present() {
        let actions = vec![action("bv-1", ReviewOutcome::Note, "check naming")];
        let text = full_prompt(&actions, titles);
        assert!(text.contains("- Notes: 1"));
        assert!(text.contains("## Reviewer Notes\n- `bv-1`: check naming"));
    }
}
