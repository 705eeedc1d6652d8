#![forbid(unsafe_code)]

mod clipboard;
mod cmd;
mod output;
mod tui;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "arbor: review issue trees from the terminal",
    long_about = None
)]
struct Cli {
    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        OutputMode::from_json_flag(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Review an issue tree interactively",
        long_about = "Open the review dashboard on a root issue and its descendants. \
                      Decisions are written back as review comments on quit.",
        after_help = "EXAMPLES:\n    # Review an epic\n    arbor review bv-12\n\n    # Review as a named security reviewer without saving\n    arbor review bv-12 --reviewer alice --type security --no-save\n\n    # Use an issues file outside the project\n    arbor review bv-12 --issues ../tracker/issues.jsonl"
    )]
    Review(cmd::review::ReviewArgs),

    #[command(
        about = "Print an issue tree",
        long_about = "Print the root issue and its descendants in hierarchical order, \
                      applying the same filters as the dashboard.",
        after_help = "EXAMPLES:\n    # Print the whole tree\n    arbor tree bv-12\n\n    # Only issues still waiting for review, labelled backend\n    arbor tree bv-12 --filter unreviewed --label backend\n\n    # Emit one JSON object per row\n    arbor tree bv-12 --json"
    )]
    Tree(cmd::tree::TreeArgs),
}

/// Install the global subscriber. Logs go to stderr so they never mix with
/// command output or the dashboard.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("ARBOR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "arbor=debug,arbor_core=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("ARBOR_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Review(ref args) => cmd::review::run_review(args, output, &project_root),
        Commands::Tree(ref args) => cmd::tree::run_tree(args, output, &project_root),
    }
}
