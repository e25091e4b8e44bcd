//! Merge command - merge topic branches onto an integration branch

use crate::cli::CliProgress;
use crate::cli::style::{Stylize, arrow, check, cross};
use anstream::println;
use dialoguer::Confirm;
use integration_branch_builder::error::{Error, Result};
use integration_branch_builder::git::GitRepository;
use integration_branch_builder::merge::{
    TopicMergeOptions, TopicMergePlan, TopicMergeResult, TopicStep, create_topic_plan,
    merge_topics,
};
use integration_branch_builder::types::TopicMergeRequest;
use std::path::Path;

/// Options for the merge command
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeCommandOptions {
    /// Dry run - show what would be merged without making changes
    pub dry_run: bool,
    /// Preview plan and prompt for confirmation before executing
    pub confirm: bool,
    /// Verbosity level
    pub verbose: u8,
}

/// Run the merge command
pub fn run_merge(
    path: &Path,
    integration: &str,
    topics: Vec<String>,
    options: MergeCommandOptions,
) -> Result<()> {
    let repo = GitRepository::new(path);
    let plan = create_topic_plan(&TopicMergeRequest::new(integration, topics));

    if options.dry_run {
        report_dry_run(&plan);
        return Ok(());
    }

    if options.confirm && !confirm_plan(&plan)? {
        return Ok(());
    }

    let progress = CliProgress::new(options.verbose);
    let result = merge_topics(
        &repo,
        &plan,
        TopicMergeOptions {
            capture_diff: progress.show_diffs(),
        },
        &progress,
    )?;

    print_merge_summary(&plan, &result);
    result.into_result().map(|_| ())
}

/// Print the plan as it would run
pub fn report_dry_run(plan: &TopicMergePlan) {
    println!(
        "{} {}",
        "Would merge onto".emphasis(),
        plan.target_branch.accent()
    );
    if plan.steps.is_empty() {
        println!("{}", "  (no topic branches)".muted());
    }
    for step in &plan.steps {
        match step {
            TopicStep::Merge { branch } => println!("  {} {branch}", arrow()),
            TopicStep::Skip { .. } => println!("  {}", step.to_string().muted()),
        }
    }
}

/// Show the plan and ask before running it
pub fn confirm_plan(plan: &TopicMergePlan) -> Result<bool> {
    report_dry_run(plan);
    let proceed = Confirm::new()
        .with_prompt("Proceed with merge?")
        .default(true)
        .interact()
        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?;
    if !proceed {
        println!("{}", "Aborted".muted());
    }
    println!();
    Ok(proceed)
}

/// Print what happened to each planned topic
pub fn print_merge_summary(plan: &TopicMergePlan, result: &TopicMergeResult) {
    println!();
    if result.is_success() {
        println!(
            "{} Merged {} topic branch(es) onto {}",
            check(),
            result.merged_count().to_string().accent(),
            plan.target_branch.emphasis()
        );
        return;
    }

    println!(
        "{} Stopped after {} of {} topic branch(es)",
        cross(),
        result.merged_count().to_string().accent(),
        plan.merge_count()
    );
    if let Some(unresolved) = &result.unresolved {
        println!(
            "{}",
            format!(
                "Resolve the conflicts from {} and commit, then merge the remaining branches.",
                unresolved.branch
            )
            .warn()
        );
    }
    if !result.not_attempted.is_empty() {
        println!("{}", "Not attempted:".muted());
        for branch in &result.not_attempted {
            println!("  {}", branch.muted());
        }
    }
}
