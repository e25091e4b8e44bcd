//! ibb - build integration branches from pull request topics

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use cli::style::Stylize;
use cli::{
    BuildCommandOptions, DiscoveryArgs, MergeCommandOptions, WarmCommandOptions, run_build,
    run_config, run_discover, run_merge, run_warm,
};
use integration_branch_builder::error::{Error, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Build integration branches with rerere-trained merges
#[derive(Parser, Debug)]
#[command(name = "ibb", version, about)]
struct Cli {
    /// Path to the repository (defaults to current directory)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Increase output (-v shows conflict diffs and info logs, -vv debug logs)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train the rerere cache from the merges at the tip of <baseline>..<resolved>
    Warm {
        /// Branch the merges were built on
        baseline: String,

        /// Branch holding the resolved merges
        resolved: String,

        /// Delete recorded resolutions before warming
        #[arg(long)]
        clear_cache: bool,

        /// Show the merge chain without replaying it
        #[arg(long)]
        dry_run: bool,
    },

    /// Merge topic branches onto an integration branch, in order
    Merge {
        /// Branch receiving the merges
        integration: String,

        /// Topic branches to merge
        #[arg(required = true)]
        topics: Vec<String>,

        /// Show what would be merged without making changes
        #[arg(long)]
        dry_run: bool,

        /// Preview plan and prompt for confirmation before merging
        #[arg(long)]
        confirm: bool,
    },

    /// List source branches of open pull requests targeting a branch
    Discover {
        /// Branch the pull requests target
        target: String,

        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Authorization header value, e.g. "Bearer <token>" [env: IBB_AUTH_HEADER]
        #[arg(long)]
        auth_header: Option<String>,
    },

    /// Rebuild an integration branch from the pull requests targeting a branch
    Build {
        /// Branch the pull requests target
        target: String,

        /// Integration branch to (re)create [default: integration/<target>]
        #[arg(long)]
        integration: Option<String>,

        /// Starting point for the integration branch [default: <remote>/<target>]
        #[arg(long)]
        base: Option<String>,

        /// Fetch the remote first
        #[arg(long)]
        fetch: bool,

        /// Show what would be merged without making changes
        #[arg(long)]
        dry_run: bool,

        /// Preview plan and prompt for confirmation before merging
        #[arg(long)]
        confirm: bool,

        #[command(flatten)]
        discovery: DiscoveryArgs,

        /// Authorization header value, e.g. "Bearer <token>" [env: IBB_AUTH_HEADER]
        #[arg(long)]
        auth_header: Option<String>,
    },

    /// Show or update stored discovery defaults
    Config {
        #[command(flatten)]
        discovery: DiscoveryArgs,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let verbose = cli.verbose;

    match cli.command {
        Commands::Warm {
            baseline,
            resolved,
            clear_cache,
            dry_run,
        } => run_warm(
            &path,
            &baseline,
            &resolved,
            WarmCommandOptions {
                clear_cache,
                dry_run,
                verbose,
            },
        ),
        Commands::Merge {
            integration,
            topics,
            dry_run,
            confirm,
        } => run_merge(
            &path,
            &integration,
            topics,
            MergeCommandOptions {
                dry_run,
                confirm,
                verbose,
            },
        ),
        Commands::Discover {
            target,
            discovery,
            auth_header,
        } => run_discover(&path, &target, &discovery, auth_header.as_deref()).await,
        Commands::Build {
            target,
            integration,
            base,
            fetch,
            dry_run,
            confirm,
            discovery,
            auth_header,
        } => {
            run_build(
                &path,
                &target,
                BuildCommandOptions {
                    integration,
                    base,
                    fetch,
                    dry_run,
                    confirm,
                    verbose,
                },
                &discovery,
                auth_header.as_deref(),
            )
            .await
        }
        Commands::Config { discovery } => run_config(&path, &discovery),
    }
}

fn report_error(error: &Error) {
    anstream::eprintln!("{} {error}", "error:".error());
    if let Error::Command { command, stderr, .. } = error {
        anstream::eprintln!("{}", format!("  command: {command}").muted());
        if !stderr.trim().is_empty() {
            anstream::eprintln!("{}", stderr.trim().muted());
        }
    }
}
