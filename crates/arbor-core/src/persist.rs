//! Writing session actions back to the tracker.

use crate::error::ArborError;
use crate::jsonl::IssueLines;
use crate::model::{Comment, ReviewAction};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-action outcome of a save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SaveResult {
    pub saved: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl SaveResult {
    fn fail(&mut self, message: String) {
        warn!(%message, "review action not saved");
        self.failed += 1;
        self.errors.push(message);
    }
}

/// Destination for a session's actions.
pub trait ReviewSaver {
    /// Persist `actions` in order, reporting per-action success.
    fn save(&mut self, actions: &[ReviewAction]) -> SaveResult;
}

/// Appends each action as a review comment to the issue in a JSONL file.
///
/// Only the records that receive a comment are re-serialized; every other
/// line, including ones that do not parse, is written back unchanged. The
/// file is rewritten through a temporary file in the same directory and
/// renamed into place, so readers never observe a partial write.
#[derive(Debug, Clone)]
pub struct JsonlCommentSaver {
    path: PathBuf,
}

impl JsonlCommentSaver {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn rewrite(&self, actions: &[ReviewAction], result: &mut SaveResult) -> Result<(), ArborError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| ArborError::io(&self.path, e))?;
        let mut lines = IssueLines::parse(&content);

        let mut next_comment_id = lines.max_comment_id();
        let mut saved = 0;

        for action in actions {
            let Some(record) = lines.record_mut(&action.issue_id) else {
                result.fail(format!("{}: issue not found", action.issue_id));
                continue;
            };
            let comments = record
                .entry("comments")
                .or_insert_with(|| Value::Array(Vec::new()));
            let Value::Array(comments) = comments else {
                result.fail(format!("{}: comments field is not a list", action.issue_id));
                continue;
            };
            next_comment_id += 1;
            comments.push(serde_json::to_value(Comment {
                id: next_comment_id,
                issue_id: action.issue_id.clone(),
                author: action.reviewer.clone(),
                text: action.to_comment(),
                created_at: Some(action.timestamp),
            })?);
            record.insert(
                "updated_at".to_string(),
                serde_json::to_value(action.timestamp)?,
            );
            saved += 1;
        }

        if saved == 0 {
            return Ok(());
        }

        let rendered = lines.render()?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ArborError::io(dir, e))?;
        tmp.write_all(rendered.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| ArborError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| ArborError::io(&self.path, e.error))?;

        result.saved = saved;
        Ok(())
    }
}

impl ReviewSaver for JsonlCommentSaver {
    fn save(&mut self, actions: &[ReviewAction]) -> SaveResult {
        let mut result = SaveResult::default();
        if actions.is_empty() {
            return result;
        }

        if let Err(e) = self.rewrite(actions, &mut result) {
            // Nothing reached disk; every action that was not already
            // reported as missing failed with the write.
            let pending = actions.len() - result.failed;
            for _ in 0..pending {
                result.fail(e.to_string());
            }
            result.saved = 0;
        }

        info!(
            path = %self.path.display(),
            saved = result.saved,
            failed = result.failed,
            "saved review session"
        );
        result
    }
}

/// Keeps saved actions in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySaver {
    pub saved: Vec<ReviewAction>,
    /// Ids that should be reported as failures.
    pub reject: Vec<String>,
}

impl ReviewSaver for MemorySaver {
    fn save(&mut self, actions: &[ReviewAction]) -> SaveResult {
        let mut result = SaveResult::default();
        for action in actions {
            if self.reject.contains(&action.issue_id) {
                result.fail(format!("{}: rejected", action.issue_id));
            } else {
                self.saved.push(action.clone());
                result.saved += 1;
            }
        }
        result
    }
}
