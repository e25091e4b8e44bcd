//! Topic merge execution - effectful operations
//!
//! This module contains the effectful code that actually performs merges.
//! It takes a `TopicMergePlan` (created by the pure planning functions) and
//! merges each topic branch through the repository collaborator.

use crate::error::{Error, Result};
use crate::git::Repository;
use crate::merge::plan::{TopicMergePlan, TopicStep};
use crate::progress::ProgressCallback;
use crate::types::{MergeStatus, ResolutionOutcome};
use tracing::{debug, info};

/// Options for topic merge execution
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicMergeOptions {
    /// Capture the full conflict diff when a merge is left unresolved
    pub capture_diff: bool,
}

/// A topic merge that needs manual resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedMerge {
    /// Topic branch whose merge conflicted
    pub branch: String,
    /// Files still conflicted in the working tree
    pub files: Vec<String>,
    /// Unified diff of the conflicts, when requested
    pub diff: Option<String>,
}

impl From<UnresolvedMerge> for Error {
    fn from(unresolved: UnresolvedMerge) -> Self {
        Self::Unresolved {
            branch: unresolved.branch,
            files: unresolved.files,
        }
    }
}

/// Result of topic merge execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicMergeResult {
    /// Topic branches that merged, with how each was settled
    pub outcomes: Vec<(String, ResolutionOutcome)>,
    /// Merge that halted the chain (if any)
    pub unresolved: Option<UnresolvedMerge>,
    /// Topic branches never attempted because the chain halted
    pub not_attempted: Vec<String>,
}

impl TopicMergeResult {
    /// Check if every planned merge succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.unresolved.is_none()
    }

    /// Number of merge commits created
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Convert an unresolved halt into an error
    ///
    /// # Errors
    /// `Unresolved` when the chain halted on a conflict.
    pub fn into_result(self) -> Result<Self> {
        match self.unresolved {
            Some(unresolved) => Err(unresolved.into()),
            None => Ok(self),
        }
    }
}

/// Execute the topic merge plan (EFFECTFUL)
///
/// Checks out the target branch, then merges each planned topic in order. The
/// chain halts at the first merge the resolution cache cannot settle and the
/// repository is left mid-merge for manual resolution. Skipped steps do not
/// halt the chain.
///
/// # Errors
/// `NotARepository` before any mutation, `MergeFailed` when git refuses a
/// merge without entering a conflicted state, or any command failure.
pub fn merge_topics(
    repo: &dyn Repository,
    plan: &TopicMergePlan,
    options: TopicMergeOptions,
    progress: &dyn ProgressCallback,
) -> Result<TopicMergeResult> {
    repo.ensure_repository()?;
    repo.checkout_branch(&plan.target_branch)?;

    let mut result = TopicMergeResult::default();

    for (index, step) in plan.steps.iter().enumerate() {
        let branch = match step {
            TopicStep::Merge { branch } => branch,
            TopicStep::Skip { branch, reason } => {
                progress.on_message(&format!("Skipping {branch}: {reason}"));
                continue;
            }
        };

        progress.on_topic_start(branch);
        let files = match attempt_merge(repo, branch)? {
            Attempt::Merged(outcome) => {
                info!(branch, %outcome, "merged topic");
                progress.on_topic_merged(branch, outcome);
                result.outcomes.push((branch.clone(), outcome));
                continue;
            }
            Attempt::Conflicts(files) => files,
        };

        let diff = if options.capture_diff {
            Some(repo.conflict_diff()?)
        } else {
            None
        };
        let unresolved = UnresolvedMerge {
            branch: branch.clone(),
            files,
            diff,
        };
        progress.on_topic_unresolved(&unresolved);
        result.unresolved = Some(unresolved);
        result.not_attempted = plan.steps[index + 1..]
            .iter()
            .filter_map(|s| match s {
                TopicStep::Merge { branch } => Some(branch.clone()),
                TopicStep::Skip { .. } => None,
            })
            .collect();
        break;
    }

    Ok(result)
}

/// How a single merge attempt ended
enum Attempt {
    /// A merge commit was created
    Merged(ResolutionOutcome),
    /// Conflicts remain in these files
    Conflicts(Vec<String>),
}

fn attempt_merge(repo: &dyn Repository, branch: &str) -> Result<Attempt> {
    match repo.merge_topic(branch)? {
        MergeStatus::Completed => Ok(Attempt::Merged(ResolutionOutcome::Clean)),
        MergeStatus::Conflicted => {
            let unstaged = repo.unstaged_files()?;
            if unstaged.is_empty() {
                debug!(branch, "conflicts settled from resolution cache");
                repo.commit_merge()?;
                Ok(Attempt::Merged(ResolutionOutcome::CacheResolved))
            } else {
                debug!(branch, files = unstaged.len(), "conflicts remain");
                Ok(Attempt::Conflicts(unstaged))
            }
        }
        MergeStatus::Failed(message) => Err(Error::MergeFailed {
            branch: branch.to_string(),
            message,
        }),
    }
}

/// Merge one topic branch and classify the outcome (EFFECTFUL)
///
/// A conflicted merge with nothing left unstaged was settled from recorded
/// resolutions and gets committed here. An `Unresolved` merge is left in
/// progress.
///
/// # Errors
/// `MergeFailed` when git refuses the merge outright.
pub fn merge_topic(repo: &dyn Repository, branch: &str) -> Result<ResolutionOutcome> {
    Ok(match attempt_merge(repo, branch)? {
        Attempt::Merged(outcome) => outcome,
        Attempt::Conflicts(_) => ResolutionOutcome::Unresolved,
    })
}
