//! `arbor tree` prints the flattened review tree without the dashboard.

use super::{issues_path, load_tree};
use crate::output::OutputMode;
use arbor_core::model::{ReviewStatus, Status};
use arbor_core::tree::{NodeFilter, StatusFilter, flatten_filtered};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Root issue to print.
    pub root: String,

    /// Issues file (JSONL). Defaults to `.arbor/issues.jsonl`.
    #[arg(long, value_name = "PATH")]
    pub issues: Option<PathBuf>,

    /// Review status filter: all, unreviewed or needs_revision.
    #[arg(long, default_value = "all")]
    pub filter: StatusFilter,

    /// Case-insensitive substring over id and title.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Required label; repeat to require several.
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,
}

/// One printed row.
#[derive(Debug, Serialize)]
pub struct TreeRow<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub depth: usize,
    pub prefix: &'a str,
    pub status: Status,
    pub review_status: ReviewStatus,
    pub labels: &'a [String],
}

/// Execute `arbor tree <root>`.
///
/// # Errors
///
/// Returns an error if the issues file cannot be loaded, the root is
/// unknown, or stdout cannot be written.
pub fn run_tree(args: &TreeArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let path = issues_path(args.issues.as_deref(), project_root);
    let tree = load_tree(&path, &args.root, output)?;
    let (items, _) = tree.into_parts();

    let mut filter = NodeFilter {
        status: args.filter,
        search: args.search.trim().to_string(),
        labels: Vec::new(),
    };
    for label in &args.labels {
        filter.add_label(label);
    }
    let nodes = flatten_filtered(&items, &args.root, &filter);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for node in &nodes {
        let item = &items[node.index];
        if output.is_json() {
            let row = TreeRow {
                id: &item.id,
                title: &item.title,
                depth: node.depth,
                prefix: &node.prefix,
                status: item.status,
                review_status: item.review_status,
                labels: &item.labels,
            };
            serde_json::to_writer(&mut out, &row)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{}{} {}  {}",
                node.prefix,
                item.review_status.glyph(),
                item.id,
                item.title
            )?;
        }
    }
    Ok(())
}
