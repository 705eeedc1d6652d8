//! Review vocabulary: statuses, outcomes, actions and the structured
//! comment format reviews are persisted in.

use crate::model::item::{Item, ParseEnumError, normalize};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Marker opening a structured review comment.
pub const REVIEW_MARKER: &str = "[REVIEW]";
/// Marker closing a structured review comment.
pub const REVIEW_END_MARKER: &str = "[/REVIEW]";
/// Marker written by older tooling; still accepted when parsing.
pub const LEGACY_REVIEW_MARKER: &str = "---REVIEW---";

/// Review state of a single item. An absent status reads as `Unreviewed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Unreviewed,
    Approved,
    NeedsRevision,
    Deferred,
}

impl ReviewStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unreviewed => "unreviewed",
            Self::Approved => "approved",
            Self::NeedsRevision => "needs_revision",
            Self::Deferred => "deferred",
        }
    }

    /// Single-character marker used in lists and prompts.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Unreviewed => "·",
            Self::Approved => "✓",
            Self::NeedsRevision => "!",
            Self::Deferred => "?",
        }
    }
}

/// What a reviewer decided. `Note` records text without a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Approved,
    NeedsRevision,
    Deferred,
    Note,
}

impl ReviewOutcome {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::NeedsRevision => "needs_revision",
            Self::Deferred => "deferred",
            Self::Note => "note",
        }
    }

    /// Marker used in prompts; matches [`ReviewStatus::glyph`].
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self.status() {
            Some(status) => status.glyph(),
            None => "•",
        }
    }

    /// The review status this outcome moves an item to, if any.
    #[must_use]
    pub const fn status(self) -> Option<ReviewStatus> {
        match self {
            Self::Approved => Some(ReviewStatus::Approved),
            Self::NeedsRevision => Some(ReviewStatus::NeedsRevision),
            Self::Deferred => Some(ReviewStatus::Deferred),
            Self::Note => None,
        }
    }
}

/// The lens a review session is conducted through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    #[default]
    Plan,
    Implementation,
    Security,
}

impl ReviewType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Implementation => "implementation",
            Self::Security => "security",
        }
    }
}

/// Immutable record of one decision made during a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAction {
    pub issue_id: String,
    pub outcome: ReviewOutcome,
    pub reviewer: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub review_type: ReviewType,
    pub timestamp: DateTime<Utc>,
}

impl ReviewAction {
    /// Render the action as a structured review comment.
    #[must_use]
    pub fn to_comment(&self) -> String {
        let mut out = String::new();
        out.push_str(REVIEW_MARKER);
        out.push('\n');
        out.push_str(&format!("status: {}\n", self.outcome.as_str()));
        out.push_str(&format!("reviewer: {}\n", self.reviewer));
        out.push_str(&format!(
            "date: {}\n",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push_str(&format!("type: {}\n", self.review_type.as_str()));
        if !self.notes.is_empty() {
            out.push_str(&format!("notes: {}\n", self.notes));
        }
        out.push_str(REVIEW_END_MARKER);
        out
    }
}

/// Review fields recovered from a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReview {
    pub status: ReviewStatus,
    pub reviewer: String,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub notes: String,
}

/// Parse a structured review comment.
///
/// Accepts both the current and the legacy marker, with field names matched
/// case-insensitively. The first `status`, `reviewer` and `date` lines win,
/// and everything after `notes:` up to the end marker is note text, so
/// multi-line notes cannot shadow the header. Returns `None` for ordinary
/// comments and for review blocks whose status is absent or is not a review
/// status (such as `note`).
#[must_use]
pub fn parse_review_comment(text: &str) -> Option<ParsedReview> {
    if !text.contains(REVIEW_MARKER) && !text.contains(LEGACY_REVIEW_MARKER) {
        return None;
    }

    let mut status = None;
    let mut reviewer = None;
    let mut date = None;
    let mut notes: Option<String> = None;

    for line in text.lines() {
        if line.trim() == REVIEW_END_MARKER {
            break;
        }
        if let Some(notes) = notes.as_mut() {
            notes.push('\n');
            notes.push_str(line.trim_end());
            continue;
        }
        let Some((key, value)) = line.trim().split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "status" => {
                status.get_or_insert(value);
            }
            "reviewer" => {
                reviewer.get_or_insert(value);
            }
            "date" => {
                date.get_or_insert(value);
            }
            "notes" => notes = Some(value.to_string()),
            _ => {}
        }
    }

    let status = status
        .filter(|value| !value.is_empty())?
        .parse::<ReviewStatus>()
        .ok()?;
    Some(ParsedReview {
        status,
        reviewer: reviewer.unwrap_or_default().to_string(),
        reviewed_at: date
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        notes: notes
            .map(|notes| notes.trim_end().to_string())
            .unwrap_or_default(),
    })
}

/// The most recent review found among `comments`.
///
/// An undated review only wins while no dated review has been seen.
pub fn latest_review<'a>(comments: impl IntoIterator<Item = &'a str>) -> Option<ParsedReview> {
    let mut latest: Option<ParsedReview> = None;
    for parsed in comments.into_iter().filter_map(parse_review_comment) {
        let newer = match (&latest, parsed.reviewed_at) {
            (None, _) => true,
            (Some(current), Some(at)) => current.reviewed_at.is_none_or(|seen| at > seen),
            (Some(current), None) => current.reviewed_at.is_none(),
        };
        if newer {
            latest = Some(parsed);
        }
    }
    latest
}

/// Restore an item's review fields from its comment history.
///
/// Returns `true` when a review comment was found.
pub fn restore_review_state(item: &mut Item) -> bool {
    let Some(parsed) = latest_review(item.comments.iter().map(|c| c.text.as_str())) else {
        return false;
    };
    item.review_status = parsed.status;
    item.reviewed_by = (!parsed.reviewer.is_empty()).then_some(parsed.reviewer);
    item.reviewed_at = parsed.reviewed_at;
    true
}

/// Review status totals over a set of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReviewSummary {
    pub total: usize,
    pub unreviewed: usize,
    pub approved: usize,
    pub needs_revision: usize,
    pub deferred: usize,
}

impl ReviewSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut summary = Self::default();
        for item in items {
            summary.total += 1;
            match item.review_status {
                ReviewStatus::Unreviewed => summary.unreviewed += 1,
                ReviewStatus::Approved => summary.approved += 1,
                ReviewStatus::NeedsRevision => summary.needs_revision += 1,
                ReviewStatus::Deferred => summary.deferred += 1,
            }
        }
        summary
    }

    #[must_use]
    pub const fn reviewed(&self) -> usize {
        self.total - self.unreviewed
    }

    /// Fraction of reviewed items that were approved, `0.0` when none were.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn approval_rate(&self) -> f64 {
        let reviewed = self.reviewed();
        if reviewed == 0 {
            0.0
        } else {
            self.approved as f64 / reviewed as f64
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ReviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "" | "unreviewed" => Ok(Self::Unreviewed),
            "approved" => Ok(Self::Approved),
            "needs_revision" => Ok(Self::NeedsRevision),
            "deferred" => Ok(Self::Deferred),
            _ => Err(ParseEnumError {
                expected: "review status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for ReviewType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "plan" => Ok(Self::Plan),
            "implementation" => Ok(Self::Implementation),
            "security" => Ok(Self::Security),
            _ => Err(ParseEnumError {
                expected: "review type",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Comment;
    use chrono::TimeZone;

    fn action(outcome: ReviewOutcome, notes: &str) -> ReviewAction {
        ReviewAction {
            issue_id: "bv-1.2".to_string(),
            outcome,
            reviewer: "ana".to_string(),
            notes: notes.to_string(),
            review_type: ReviewType::Implementation,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap(),
        }
    }

    fn comment(text: &str) -> Comment {
        Comment {
            id: 0,
            issue_id: String::new(),
            author: String::new(),
            text: text.to_string(),
            created_at: None,
        }
    }

    #[test]
    fn comment_format_is_stable() {
        let text = action(ReviewOutcome::NeedsRevision, "split the parser").to_comment();
        assert_eq!(
            text,
            "[REVIEW]\nstatus: needs_revision\nreviewer: ana\ndate: 2026-03-04T05:06:07Z\n\
             type: implementation\nnotes: split the parser\n[/REVIEW]"
        );
    }

    #[test]
    fn comment_without_notes_omits_the_line() {
        let text = action(ReviewOutcome::Approved, "").to_comment();
        assert!(!text.contains("notes:"));
    }

    #[test]
    fn written_comment_parses_back() {
        let parsed = parse_review_comment(&action(ReviewOutcome::Deferred, "later").to_comment())
            .unwrap();
        assert_eq!(parsed.status, ReviewStatus::Deferred);
        assert_eq!(parsed.reviewer, "ana");
        assert_eq!(parsed.notes, "later");
        assert_eq!(
            parsed.reviewed_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap())
        );
    }

    #[test]
    fn multi_line_notes_keep_the_header_intact() {
        let notes = "Missing tests.\nStatus: blocked on infra\ndate: someday";
        let parsed =
            parse_review_comment(&action(ReviewOutcome::NeedsRevision, notes).to_comment())
                .unwrap();
        assert_eq!(parsed.status, ReviewStatus::NeedsRevision);
        assert_eq!(
            parsed.reviewed_at,
            Some(Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap())
        );
        assert_eq!(parsed.notes, notes);
    }

    #[test]
    fn first_header_line_wins() {
        let text = "[REVIEW]\nstatus: deferred\nreviewer: a\nstatus: approved\nreviewer: b\n[/REVIEW]";
        let parsed = parse_review_comment(text).unwrap();
        assert_eq!(parsed.status, ReviewStatus::Deferred);
        assert_eq!(parsed.reviewer, "a");
    }

    #[test]
    fn legacy_marker_and_titlecase_fields_are_accepted() {
        let text = "---REVIEW---\nStatus: approved\nReviewer: bo\nDate: 2025-01-01T00:00:00Z\n";
        let parsed = parse_review_comment(text).unwrap();
        assert_eq!(parsed.status, ReviewStatus::Approved);
        assert_eq!(parsed.reviewer, "bo");
    }

    #[test]
    fn plain_and_note_comments_are_ignored() {
        assert!(parse_review_comment("looks good to me").is_none());
        assert!(parse_review_comment(&action(ReviewOutcome::Note, "fyi").to_comment()).is_none());
        assert!(parse_review_comment("[REVIEW]\nreviewer: x\n[/REVIEW]").is_none());
    }

    #[test]
    fn latest_review_wins_by_date() {
        let older = "[REVIEW]\nstatus: needs_revision\nreviewer: a\ndate: 2025-01-01T00:00:00Z\n[/REVIEW]";
        let newer = "[REVIEW]\nstatus: approved\nreviewer: b\ndate: 2025-06-01T00:00:00Z\n[/REVIEW]";
        let latest = latest_review([newer, older]).unwrap();
        assert_eq!(latest.status, ReviewStatus::Approved);
        assert_eq!(latest.reviewer, "b");
    }

    #[test]
    fn restore_sets_item_fields() {
        let mut item = Item::new("bv-1", "Root");
        item.comments.push(comment("unrelated"));
        item.comments
            .push(comment(&action(ReviewOutcome::NeedsRevision, "").to_comment()));
        assert!(restore_review_state(&mut item));
        assert_eq!(item.review_status, ReviewStatus::NeedsRevision);
        assert_eq!(item.reviewed_by.as_deref(), Some("ana"));

        let mut bare = Item::new("bv-2", "Other");
        assert!(!restore_review_state(&mut bare));
        assert!(bare.is_unreviewed());
    }

    #[test]
    fn summary_counts_each_status() {
        let mut a = Item::new("a", "a");
        a.review_status = ReviewStatus::Approved;
        let mut b = Item::new("b", "b");
        b.review_status = ReviewStatus::NeedsRevision;
        let c = Item::new("c", "c");
        let summary = ReviewSummary::from_items([&a, &b, &c]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.reviewed(), 2);
        assert!((summary.approval_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_status_reads_as_unreviewed() {
        assert_eq!("".parse::<ReviewStatus>().unwrap(), ReviewStatus::Unreviewed);
        assert!("note".parse::<ReviewStatus>().is_err());
    }
}
