//! Warm command - train the resolution cache from historical merges

use crate::cli::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::println;
use integration_branch_builder::error::Result;
use integration_branch_builder::git::GitRepository;
use integration_branch_builder::replay::{ReplayOptions, ReplayReport, warm_resolution_cache};
use std::path::Path;

/// Options for the warm command
#[derive(Debug, Clone, Copy, Default)]
pub struct WarmCommandOptions {
    /// Delete recorded resolutions first
    pub clear_cache: bool,
    /// Show the merge chain without replaying it
    pub dry_run: bool,
    /// Verbosity level
    pub verbose: u8,
}

/// Run the warm command
pub fn run_warm(
    path: &Path,
    baseline: &str,
    resolved: &str,
    options: WarmCommandOptions,
) -> Result<()> {
    let repo = GitRepository::new(path);
    let progress = CliProgress::new(options.verbose);

    if options.dry_run {
        println!("{}", "Dry run: the working tree is not touched.".muted());
    }

    let report = warm_resolution_cache(
        &repo,
        baseline,
        resolved,
        ReplayOptions {
            clear_cache: options.clear_cache,
            dry_run: options.dry_run,
        },
        &progress,
    )?;

    print_warm_summary(&report, options.dry_run);
    Ok(())
}

fn print_warm_summary(report: &ReplayReport, dry_run: bool) {
    if report.chain.is_empty() {
        return;
    }

    println!();
    if dry_run {
        println!(
            "{} merge(s) would be replayed",
            report.chain.len().to_string().accent()
        );
        return;
    }

    println!(
        "{} Trained on {} of {} merge(s)",
        check(),
        report.trained.len().to_string().accent(),
        report.chain.len()
    );
    if !report.is_success() {
        println!(
            "{}",
            format!("{} merge(s) could not be replayed:", report.failed.len()).warn()
        );
        for failure in &report.failed {
            println!("  {} {}", failure.commit.short_hash(), failure.error.muted());
        }
    }
}
