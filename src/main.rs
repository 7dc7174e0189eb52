//! git-summary - CLI entry point.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_summary::config::{keys, weekly_overrides};
use git_summary::git::{GitCli, check_git_installed, resolve_workspace};
use git_summary::{RunOptions, SummaryConfig, SummaryError, TerminalHost, build_client, run};

/// Summarize recent git commits into a Markdown work report.
#[derive(Parser, Debug)]
#[command(name = "git-summary")]
#[command(about = "Summarize recent git commits into a Markdown work report")]
#[command(version)]
struct Cli {
    /// Show debug logs (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize commits with the configured time range and mode
    Generate(GenerateArgs),
    /// Summarize the last week's commit subjects
    Weekly(WeeklyArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// How far back to look, passed to `git log --since` (e.g. "2 weeks ago")
    #[arg(long)]
    since: Option<String>,

    /// Only include commits by this author
    #[arg(long)]
    author: Option<String>,

    /// Summary mode: subject, full or both
    #[arg(long)]
    mode: Option<String>,

    /// Chat model to use
    #[arg(long)]
    model: Option<String>,

    /// Maximum number of diff lines kept per commit
    #[arg(long)]
    max_diff_lines: Option<usize>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Directory the summary is written to
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct WeeklyArgs {
    /// Only include commits by this author
    #[arg(long)]
    author: Option<String>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Repository to summarize (defaults to the current directory)
    #[arg(short = 'C', long)]
    repo: Option<PathBuf>,

    /// Print the summary instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Never prompt for the API key
    #[arg(long)]
    no_input: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        let mut set = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                overrides.insert(key.to_string(), value);
            }
        };

        set(keys::TIME_RANGE, self.since.clone());
        set(keys::AUTHOR, self.author.clone());
        set(keys::MODE, self.mode.clone());
        set(keys::MODEL, self.model.clone());
        set(keys::MAX_DIFF_LINES, self.max_diff_lines.map(|n| n.to_string()));
        set(keys::BASE_URL, self.base_url.clone());
        set(
            keys::OUTPUT_DIR,
            self.output_dir.as_ref().map(|p| p.display().to_string()),
        );
        overrides
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // "Nothing to summarize" is an answer, not a crash.
            if let Some(summary_err) = e.downcast_ref::<SummaryError>() {
                if summary_err.is_informational() {
                    println!("{summary_err}");
                    return ExitCode::FAILURE;
                }
            }

            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn execute(command: Command) -> Result<()> {
    let (overrides, run_args) = match command {
        Command::Generate(args) => (args.overrides(), args.run),
        Command::Weekly(args) => (weekly_overrides(args.author), args.run),
    };

    check_git_installed().context("git is required")?;

    let start = match run_args.repo {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };
    let workspace = resolve_workspace(&start)?;

    let host = TerminalHost::for_workspace(&workspace, overrides, !run_args.no_input)
        .context("Failed to load configuration")?;
    let config = SummaryConfig::resolve(&host, &workspace).context("Invalid configuration")?;

    let client = build_client(&host, &config)?;
    let git = GitCli::new(config.git_timeout);
    let options = RunOptions {
        dry_run: run_args.dry_run,
        ..RunOptions::today()
    };

    let outcome = run(&host, &config, &git, &client, &options)
        .await
        .context("Failed to generate summary")?;

    match outcome.path {
        Some(path) => println!(
            "✓ Summarized {} commits into {}",
            outcome.commit_count,
            path.display()
        ),
        None => println!("{}", outcome.document),
    }

    Ok(())
}
