//! `arbor review` interactive review dashboard.

use super::{fail, issues_path, load_tree};
use crate::clipboard::SystemClipboard;
use crate::output::{OutputMode, pretty_kv};
use crate::tui::{
    self,
    dashboard::{Dashboard, DashboardOptions},
};
use arbor_core::config::load_config;
use arbor_core::model::ReviewType;
use arbor_core::persist::{JsonlCommentSaver, ReviewSaver};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// Root issue whose tree is reviewed.
    pub root: String,

    /// Issues file (JSONL). Defaults to `.arbor/issues.jsonl`.
    #[arg(long, value_name = "PATH")]
    pub issues: Option<PathBuf>,

    /// Reviewer name recorded on each action.
    #[arg(long)]
    pub reviewer: Option<String>,

    /// Review type: plan, implementation or security.
    #[arg(long = "type", value_name = "TYPE")]
    pub review_type: Option<ReviewType>,

    /// Do not write review comments back to the issues file.
    #[arg(long)]
    pub no_save: bool,
}

/// Execute `arbor review <root>`.
///
/// # Errors
///
/// Returns an error if config or issues cannot be loaded, the root is
/// unknown, or the terminal fails.
pub fn run_review(args: &ReviewArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = load_config(project_root).map_err(|e| fail(output, &e))?;
    let path = issues_path(args.issues.as_deref(), project_root);
    let tree = load_tree(&path, &args.root, output)?;

    let options = DashboardOptions {
        reviewer: args
            .reviewer
            .clone()
            .unwrap_or_else(|| config.review.reviewer.clone()),
        review_type: args.review_type.unwrap_or(config.review.review_type),
        split_percent: config.ui.split_percent,
        show_detail: config.ui.show_detail,
    };
    let saver: Option<Box<dyn ReviewSaver>> = if args.no_save || !config.review.save_on_quit {
        None
    } else {
        Some(Box::new(JsonlCommentSaver::new(path.clone())))
    };

    let mut dashboard = Dashboard::new(tree, options, Box::new(SystemClipboard::new()), saver);
    tui::run_dashboard(&mut dashboard)?;

    let Some(result) = dashboard.save_result() else {
        return Ok(());
    };
    if output.is_json() {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pretty_kv(&mut out, "saved", result.saved.to_string())?;
    pretty_kv(&mut out, "failed", result.failed.to_string())?;
    for error in &result.errors {
        writeln!(out, "  {error}")?;
    }
    Ok(())
}
