//! Integration branch build: discovery feeding the topic merge engine

use crate::error::Result;
use crate::git::Repository;
use crate::merge::{
    TopicMergeOptions, TopicMergePlan, TopicMergeResult, create_topic_plan, merge_topics,
};
use crate::platform::PullRequestSource;
use crate::progress::ProgressCallback;
use crate::types::TopicMergeRequest;
use tracing::info;

/// Options for building an integration branch
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Branch the pull requests target
    pub target: String,
    /// Branch to (re)create and merge onto
    pub integration_branch: String,
    /// Starting point for the integration branch
    pub base: String,
    /// Remote to fetch from first, if any
    pub fetch_remote: Option<String>,
    /// Merge options forwarded to the engine
    pub merge: TopicMergeOptions,
}

/// Discover topics for `options.target` and plan their merge
///
/// Nothing in the repository changes here.
///
/// # Errors
/// `DiscoveryFailed` or any other error from the pull request source.
pub async fn plan_integration_branch(
    source: &dyn PullRequestSource,
    options: &BuildOptions,
    progress: &dyn ProgressCallback,
) -> Result<TopicMergePlan> {
    progress.on_message(&format!(
        "Finding pull requests targeting {}",
        options.target
    ));
    let topics = source.branches_targeting(&options.target).await?;
    info!(target = %options.target, count = topics.len(), "discovered topic branches");

    let request = TopicMergeRequest::new(options.integration_branch.clone(), topics);
    Ok(create_topic_plan(&request))
}

/// Build an integration branch from the pull requests targeting a branch (EFFECTFUL)
///
/// Discovery runs first; if it fails no repository state is touched. The
/// integration branch is then reset to `options.base` and every discovered
/// topic is merged onto it in API order.
///
/// # Errors
/// Any discovery error before mutation, then anything `merge_topics` raises.
pub async fn build_integration_branch(
    source: &dyn PullRequestSource,
    repo: &dyn Repository,
    options: &BuildOptions,
    progress: &dyn ProgressCallback,
) -> Result<TopicMergeResult> {
    let plan = plan_integration_branch(source, options, progress).await?;
    apply_plan(repo, &plan, options, progress)
}

/// Create the integration branch and run an already-discovered plan (EFFECTFUL)
///
/// # Errors
/// `NotARepository`, fetch or branch creation failures, or anything
/// `merge_topics` raises.
pub fn apply_plan(
    repo: &dyn Repository,
    plan: &TopicMergePlan,
    options: &BuildOptions,
    progress: &dyn ProgressCallback,
) -> Result<TopicMergeResult> {
    repo.ensure_repository()?;

    if let Some(remote) = &options.fetch_remote {
        progress.on_message(&format!("Fetching {remote}"));
        repo.fetch(remote)?;
    }

    progress.on_message(&format!(
        "Resetting {} to {}",
        options.integration_branch, options.base
    ));
    repo.create_branch(&options.integration_branch, &options.base)?;

    merge_topics(repo, plan, options.merge, progress)
}
