//! Reading and patching the issues JSONL file.
//!
//! One JSON object per line. Blank lines are skipped, a UTF-8 BOM on the first
//! line is stripped, and lines that fail to parse or validate are skipped with
//! a warning so one bad record never hides the rest of the tracker.
//!
//! Writes go through [`IssueLines`], which re-serializes only the records that
//! were edited and leaves every other line exactly as it was read.

use crate::error::ArborError;
use crate::model::Item;
use crate::model::review::restore_review_state;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

/// Load every valid item from `path` and restore review state from comments.
///
/// # Errors
///
/// Returns [`ArborError::IssuesFileMissing`] if `path` does not exist and
/// [`ArborError::Io`] if it cannot be read.
pub fn load_items(path: &Path) -> Result<Vec<Item>, ArborError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ArborError::IssuesFileMissing(path.to_path_buf()));
        }
        Err(e) => return Err(ArborError::io(path, e)),
    };

    let mut items = parse_items(BufReader::new(file)).map_err(|e| ArborError::io(path, e))?;
    let restored = items
        .iter_mut()
        .map(restore_review_state)
        .filter(|restored| *restored)
        .count();
    debug!(
        path = %path.display(),
        items = items.len(),
        restored,
        "loaded issues"
    );
    Ok(items)
}

/// Parse items from a JSONL stream.
///
/// # Errors
///
/// Only I/O failures on `reader` are returned; malformed lines are skipped.
pub fn parse_items<R: BufRead>(reader: R) -> std::io::Result<Vec<Item>> {
    let mut items = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        let text = if line_no == 1 {
            line.trim_start_matches(BOM)
        } else {
            line.as_str()
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let item = match serde_json::from_str::<Item>(text) {
            Ok(item) => item,
            Err(e) => {
                warn!(line = line_no, error = %e, "skipping malformed issue line");
                continue;
            }
        };
        if let Err(e) = item.validate() {
            warn!(line = line_no, error = %e, "skipping invalid issue");
            continue;
        }
        items.push(item);
    }

    Ok(items)
}

/// One physical line of the issues file.
#[derive(Debug, Clone)]
struct RawLine {
    /// Exactly as read, including the line ending and any BOM.
    text: String,
    /// The JSON object on this line, when it is one and carries a string id.
    record: Option<Map<String, Value>>,
    dirty: bool,
}

impl RawLine {
    fn parse(text: &str, first: bool) -> Self {
        let body = if first {
            text.trim_start_matches(BOM)
        } else {
            text
        };
        let record = match serde_json::from_str::<Value>(body.trim()) {
            Ok(Value::Object(map)) if map.get("id").is_some_and(Value::is_string) => Some(map),
            _ => None,
        };
        Self {
            text: text.to_string(),
            record,
            dirty: false,
        }
    }

    fn id(&self) -> Option<&str> {
        self.record
            .as_ref()
            .and_then(|map| map.get("id"))
            .and_then(Value::as_str)
    }

    fn render(&self, out: &mut String) -> Result<(), ArborError> {
        let Some(record) = self.record.as_ref().filter(|_| self.dirty) else {
            out.push_str(&self.text);
            return Ok(());
        };
        if self.text.starts_with(BOM) {
            out.push(BOM);
        }
        out.push_str(&serde_json::to_string(record)?);
        if self.text.ends_with("\r\n") {
            out.push_str("\r\n");
        } else if self.text.ends_with('\n') {
            out.push('\n');
        }
        Ok(())
    }
}

/// The issues file held as raw lines for in-place record edits.
///
/// Lines that are malformed, fail validation or carry values this crate does
/// not understand are kept byte-for-byte; only records handed out through
/// [`IssueLines::record_mut`] are re-serialized.
#[derive(Debug, Clone, Default)]
pub struct IssueLines {
    lines: Vec<RawLine>,
}

impl IssueLines {
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let lines = content
            .split_inclusive('\n')
            .enumerate()
            .map(|(i, text)| RawLine::parse(text, i == 0))
            .collect();
        Self { lines }
    }

    /// Highest numeric comment id found on any record, `0` when none.
    #[must_use]
    pub fn max_comment_id(&self) -> i64 {
        self.lines
            .iter()
            .filter_map(|line| line.record.as_ref())
            .filter_map(|record| record.get("comments").and_then(Value::as_array))
            .flatten()
            .filter_map(|comment| comment.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
    }

    /// The first record with `id`, marked for re-serialization.
    pub fn record_mut(&mut self, id: &str) -> Option<&mut Map<String, Value>> {
        let line = self.lines.iter_mut().find(|line| line.id() == Some(id))?;
        line.dirty = true;
        line.record.as_mut()
    }

    /// Reassemble the file.
    ///
    /// # Errors
    ///
    /// Returns [`ArborError::Json`] if an edited record cannot be serialized.
    pub fn render(&self) -> Result<String, ArborError> {
        let mut out = String::new();
        for line in &self.lines {
            line.render(&mut out)?;
        }
        Ok(out)
    }
}
