//! E2E CLI tests for the non-interactive surface:
//! - `arbor tree` ordering, glyphs and filters
//! - JSON row output
//! - Error codes for a missing issues file and an unknown root
//!
//! Each test runs the `arbor` binary in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

fn arbor_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("arbor"));
    cmd.current_dir(dir);
    cmd.env("ARBOR_LOG", "error");
    cmd
}

fn child(id: &str, title: &str, parent: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "dependencies": [{ "issue_id": id, "depends_on_id": parent, "type": "parent-child" }],
    })
}

/// Write a small tree to `.arbor/issues.jsonl` and return the temp dir.
fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let revision = "[REVIEW]\nstatus: needs_revision\nreviewer: sam\ndate: 2026-01-02T03:04:05Z\ntype: plan\n[/REVIEW]";
    let mut records = vec![
        json!({ "id": "bv-1", "title": "Payments", "issue_type": "epic" }),
        child("bv-1.10", "Docs", "bv-1"),
        child("bv-1.2", "Ledger", "bv-1"),
        child("bv-1.1.1", "Tokenize", "bv-1.1"),
        child("bv-1.1", "Card api", "bv-1"),
        json!({ "id": "zz-9", "title": "Unrelated" }),
    ];
    records[2]["labels"] = json!(["backend"]);
    records[4]["labels"] = json!(["backend", "api"]);
    records[3]["comments"] = json!([{ "id": 1, "author": "sam", "text": revision }]);

    let body: String = records
        .iter()
        .map(|record| format!("{record}\n"))
        .collect();
    fs::create_dir_all(dir.path().join(".arbor")).expect("mkdir");
    fs::write(dir.path().join(".arbor/issues.jsonl"), body).expect("write issues");
    dir
}

fn stdout_lines(dir: &Path, args: &[&str]) -> Vec<String> {
    let output = arbor_cmd(dir).args(args).output().expect("arbor should run");
    assert!(
        output.status.success(),
        "arbor failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tree output
// ---------------------------------------------------------------------------

#[test]
fn tree_prints_hierarchical_order_with_prefixes() {
    let dir = project();
    let lines = stdout_lines(dir.path(), &["tree", "bv-1"]);
    assert_eq!(
        lines,
        vec![
            "· bv-1  Payments",
            "├─ · bv-1.1  Card api",
            "│  └─ ! bv-1.1.1  Tokenize",
            "├─ · bv-1.2  Ledger",
            "└─ · bv-1.10  Docs",
        ]
    );
}

#[test]
fn tree_filters_by_review_status() {
    let dir = project();
    let lines = stdout_lines(dir.path(), &["tree", "bv-1", "--filter", "needs_revision"]);
    assert_eq!(lines, vec!["· bv-1  Payments", "│  └─ ! bv-1.1.1  Tokenize"]);
}

#[test]
fn tree_requires_every_label() {
    let dir = project();
    let lines = stdout_lines(
        dir.path(),
        &["tree", "bv-1", "--label", "backend", "--label", "API"],
    );
    assert_eq!(lines, vec!["· bv-1  Payments", "├─ · bv-1.1  Card api"]);
}

#[test]
fn tree_search_matches_title_or_id() {
    let dir = project();
    let lines = stdout_lines(dir.path(), &["tree", "bv-1", "--search", "LEDGER"]);
    assert_eq!(lines, vec!["· bv-1  Payments", "├─ · bv-1.2  Ledger"]);
}

#[test]
fn tree_json_emits_one_row_per_line() {
    let dir = project();
    let lines = stdout_lines(dir.path(), &["tree", "bv-1", "--json"]);
    assert_eq!(lines.len(), 5);
    let rows: Vec<Value> = lines
        .iter()
        .map(|line| serde_json::from_str(line).expect("valid JSON row"))
        .collect();
    assert_eq!(rows[0]["id"], "bv-1");
    assert_eq!(rows[0]["depth"], 0);
    assert_eq!(rows[2]["id"], "bv-1.1.1");
    assert_eq!(rows[2]["depth"], 2);
    assert_eq!(rows[2]["review_status"], "needs_revision");
    assert_eq!(rows[1]["labels"], json!(["backend", "api"]));
}

#[test]
fn tree_reads_explicit_issues_path() {
    let dir = project();
    fs::rename(
        dir.path().join(".arbor/issues.jsonl"),
        dir.path().join("elsewhere.jsonl"),
    )
    .expect("move issues");
    let lines = stdout_lines(
        dir.path(),
        &["tree", "bv-1.1", "--issues", "elsewhere.jsonl"],
    );
    assert_eq!(lines, vec!["· bv-1.1  Card api", "└─ ! bv-1.1.1  Tokenize"]);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn unknown_root_reports_item_not_found() {
    let dir = project();
    arbor_cmd(dir.path())
        .args(["tree", "bv-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"))
        .stderr(predicate::str::contains("bv-404"));
}

#[test]
fn missing_issues_file_reports_code_and_hint() {
    let dir = TempDir::new().expect("tempdir");
    arbor_cmd(dir.path())
        .args(["tree", "bv-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn json_errors_are_structured() {
    let dir = project();
    let output = arbor_cmd(dir.path())
        .args(["tree", "bv-404", "--json"])
        .output()
        .expect("arbor should run");
    assert!(!output.status.success());
    let first = String::from_utf8_lossy(&output.stderr)
        .lines()
        .next()
        .map(str::to_string)
        .expect("stderr line");
    let value: Value = serde_json::from_str(&first).expect("JSON error");
    assert_eq!(value["error"]["error_code"], "E2001");
}
