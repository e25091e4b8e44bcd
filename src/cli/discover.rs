//! Discover command - list topic branches from open pull requests

use crate::cli::context::{DiscoveryArgs, DiscoveryContext};
use crate::cli::style::{Stylize, check, spinner_style};
use anstream::println;
use indicatif::ProgressBar;
use integration_branch_builder::error::Result;
use std::path::Path;
use std::time::Duration;

/// Run the discover command
///
/// Branch names go to stdout one per line; the spinner draws on stderr.
pub async fn run_discover(
    path: &Path,
    target: &str,
    args: &DiscoveryArgs,
    auth_header: Option<&str>,
) -> Result<()> {
    let ctx = DiscoveryContext::new(path, args, auth_header).await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message(format!(
        "Querying {} for pull requests into {}...",
        ctx.platform_config.platform,
        target.emphasis()
    ));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let branches = match ctx.source.branches_targeting(target).await {
        Ok(branches) => branches,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e);
        }
    };

    spinner.finish_with_message(format!(
        "{} Found {} pull request(s) into {}",
        check(),
        branches.len().to_string().accent(),
        target.emphasis()
    ));

    for branch in branches {
        println!("{branch}");
    }
    Ok(())
}
