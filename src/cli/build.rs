//! Build command - rebuild an integration branch from open pull requests

use crate::cli::CliProgress;
use crate::cli::context::{DiscoveryArgs, DiscoveryContext};
use crate::cli::merge::{confirm_plan, print_merge_summary, report_dry_run};
use crate::cli::style::{Stylize, check, spinner_style};
use indicatif::ProgressBar;
use integration_branch_builder::build::{BuildOptions, apply_plan, plan_integration_branch};
use integration_branch_builder::error::Result;
use integration_branch_builder::merge::TopicMergeOptions;
use integration_branch_builder::progress::NoopProgress;
use std::path::Path;
use std::time::Duration;

/// Options for the build command
#[derive(Debug, Clone, Default)]
pub struct BuildCommandOptions {
    /// Integration branch name (default `integration/<target>`)
    pub integration: Option<String>,
    /// Starting point (default `<remote>/<target>`)
    pub base: Option<String>,
    /// Fetch the remote before building
    pub fetch: bool,
    /// Dry run - show what would be merged without making changes
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Verbosity level
    pub verbose: u8,
}

/// Run the build command
pub async fn run_build(
    path: &Path,
    target: &str,
    options: BuildCommandOptions,
    args: &DiscoveryArgs,
    auth_header: Option<&str>,
) -> Result<()> {
    // =========================================================================
    // Phase 1: DISCOVER - nothing in the repository changes
    // =========================================================================

    let ctx = DiscoveryContext::new(path, args, auth_header).await?;
    let progress = CliProgress::new(options.verbose);

    let build_options = BuildOptions {
        target: target.to_string(),
        integration_branch: options
            .integration
            .unwrap_or_else(|| format!("integration/{target}")),
        base: options
            .base
            .unwrap_or_else(|| format!("{}/{target}", ctx.remote)),
        fetch_remote: options.fetch.then(|| ctx.remote.clone()),
        merge: TopicMergeOptions {
            capture_diff: progress.show_diffs(),
        },
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Querying {} for pull requests into {}...",
        ctx.platform_config.platform,
        target.emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let plan = match plan_integration_branch(ctx.source.as_ref(), &build_options, &NoopProgress).await
    {
        Ok(plan) => plan,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    spinner.finish_with_message(format!(
        "{} Found {} topic branch(es) for {}",
        check(),
        plan.merge_count().to_string().accent(),
        build_options.integration_branch.emphasis()
    ));

    // =========================================================================
    // Phase 2: BUILD - reset the integration branch and merge
    // =========================================================================

    if options.dry_run {
        report_dry_run(&plan);
        return Ok(());
    }

    if options.confirm && !confirm_plan(&plan)? {
        return Ok(());
    }

    let result = apply_plan(&ctx.repo, &plan, &build_options, &progress)?;

    print_merge_summary(&plan, &result);
    result.into_result().map(|_| ())
}
