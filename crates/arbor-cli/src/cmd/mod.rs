//! Subcommand implementations.

pub mod review;
pub mod tree;

use crate::output::{CliError, OutputMode, render_error};
use arbor_core::ArborError;
use arbor_core::tree::{ReviewTree, load_review_tree};
use std::path::{Path, PathBuf};

/// Issues file used when `--issues` is not given.
pub const DEFAULT_ISSUES_PATH: &str = ".arbor/issues.jsonl";

/// Resolve `--issues` against the project root.
pub fn issues_path(flag: Option<&Path>, project_root: &Path) -> PathBuf {
    match flag {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => project_root.join(path),
        None => project_root.join(DEFAULT_ISSUES_PATH),
    }
}

/// Render `err` in `output` mode and turn it into a command failure.
pub fn fail(output: OutputMode, err: &ArborError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, &CliError::from(err)) {
        return render_err;
    }
    anyhow::anyhow!("{err}")
}

/// Load the issues file and collect the tree below `root_id`.
///
/// # Errors
///
/// Renders and returns the first load or lookup failure.
pub fn load_tree(
    path: &Path,
    root_id: &str,
    output: OutputMode,
) -> anyhow::Result<ReviewTree> {
    let items = arbor_core::jsonl::load_items(path).map_err(|e| fail(output, &e))?;
    let tree = load_review_tree(root_id, &items).map_err(|e| fail(output, &e))?;
    tracing::info!(
        root = root_id,
        issues = tree.total_count(),
        blockers = tree.blockers.len(),
        "loaded review tree"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_path_defaults_below_root() {
        let root = Path::new("/work");
        assert_eq!(
            issues_path(None, root),
            PathBuf::from("/work/.arbor/issues.jsonl")
        );
        assert_eq!(
            issues_path(Some(Path::new("data/i.jsonl")), root),
            PathBuf::from("/work/data/i.jsonl")
        );
        assert_eq!(
            issues_path(Some(Path::new("/tmp/i.jsonl")), root),
            PathBuf::from("/tmp/i.jsonl")
        );
    }
}
