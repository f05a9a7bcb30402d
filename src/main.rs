//! hunkdex - CLI entry point.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use git2::Repository;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hunkdex::config::{Config, DeletedFiles, NeighborContext};
use hunkdex::git::{GitHistory, WorkingTree, compare_files, working_tree_diff};
use hunkdex::output::{DEFAULT_TAB_SIZE, render_text, write_json};
use hunkdex::{HistorySource, analyze};

/// Turn unified diffs into structured, commit-attributed change records.
#[derive(Parser, Debug)]
#[command(name = "hunkdex")]
#[command(about = "Turn unified diffs into structured, commit-attributed change records")]
#[command(version)]
struct Cli {
    /// Unified diff or `git log -p` output to analyze (`-` reads stdin)
    #[arg(long)]
    diff_file: Option<String>,

    /// Analyze the unstaged changes of this repository
    #[arg(long)]
    repo_path: Option<PathBuf>,

    /// Old side of a two-file comparison
    #[arg(long, requires = "compare_file_2")]
    compare_file_1: Option<PathBuf>,

    /// New side of a two-file comparison
    #[arg(long, requires = "compare_file_1")]
    compare_file_2: Option<PathBuf>,

    /// Context lines when collecting a diff
    #[arg(long, default_value_t = 0)]
    unified: u32,

    /// Also write the changes as JSON to this path
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Collapse files whose every change is a deletion into one record
    #[arg(long, conflicts_with = "drop_deleted_files")]
    suppress_deleted_files: bool,

    /// Leave out files whose every change is a deletion
    #[arg(long)]
    drop_deleted_files: bool,

    /// Collapse block deletions of at least this many lines into a summary (0 disables)
    #[arg(long)]
    summarize_deletes_over: Option<usize>,

    /// Attach this many neighbouring file lines to block changes (0 disables)
    #[arg(long)]
    context_lines: Option<usize>,

    /// Attribute all changes in a file to the last commit seen for it
    #[arg(long)]
    consolidate: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = build_config(&cli);

    let (diff_text, root) = if let Some(diff_file) = &cli.diff_file {
        (read_diff_input(diff_file)?, PathBuf::from("."))
    } else if let Some(repo_path) = &cli.repo_path {
        let repo = Repository::discover(repo_path)
            .with_context(|| format!("Not a git repository: {}", repo_path.display()))?;
        let text = working_tree_diff(&repo, config.unified)
            .context("Failed to collect working tree diff")?;
        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| repo_path.clone());
        (text, root)
    } else if let (Some(old), Some(new)) = (&cli.compare_file_1, &cli.compare_file_2) {
        let text = compare_files(old, new, config.unified).context("Failed to compare files")?;
        (text, PathBuf::from("."))
    } else {
        bail!("Provide --diff-file, --repo-path, or both --compare-file-1 and --compare-file-2");
    };

    let history = match GitHistory::open(&root) {
        Ok(history) => Some(history),
        Err(e) => {
            debug!("Commit history unavailable: {}", e);
            None
        }
    };
    let content = WorkingTree::open(&root);

    let changes = analyze(
        &diff_text,
        &config,
        history.as_ref().map(|h| h as &dyn HistorySource),
        &content,
    );

    print!("{}", render_text(&changes, Some(DEFAULT_TAB_SIZE)));

    if let Some(path) = &cli.output_json {
        write_json(path, &changes, Some(DEFAULT_TAB_SIZE))
            .with_context(|| format!("Failed to write JSON output to {}", path.display()))?;
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> Config {
    let mut config = Config::from_env();
    config.unified = cli.unified;
    config.consolidate_per_file = cli.consolidate;
    config.deleted_files = if cli.drop_deleted_files {
        DeletedFiles::Drop
    } else if cli.suppress_deleted_files {
        DeletedFiles::Summarize
    } else {
        DeletedFiles::Keep
    };
    if let Some(threshold) = cli.summarize_deletes_over {
        config.summarize_deletes_over = (threshold > 0).then_some(threshold);
    }
    if let Some(lines) = cli.context_lines {
        config.neighbor_context = (lines > 0).then(|| NeighborContext::symmetric(lines));
    }
    config
}

fn read_diff_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read diff from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read diff file {}", source))
    }
}
