//! Replay execution - effectful operations
//!
//! Drives the repository through each merge of a chain so the resolution
//! cache learns how its conflicts were settled.

use crate::error::{Error, Result};
use crate::git::Repository;
use crate::progress::ProgressCallback;
use crate::replay::chain::find_merge_chain;
use crate::types::{CommitRecord, MergeChain, MergeStatus};
use tracing::{debug, info, warn};

/// Options for a warm run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Delete every recorded resolution before replaying
    pub clear_cache: bool,
    /// Report the chain without touching the working tree
    pub dry_run: bool,
}

/// A merge that could not be replayed
#[derive(Debug)]
pub struct ReplayFailure {
    /// The merge commit
    pub commit: CommitRecord,
    /// Why it failed
    pub error: Error,
}

/// Result of a warm run
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Merge chain that was isolated, newest first
    pub chain: MergeChain,
    /// Merges whose resolutions were recorded
    pub trained: Vec<CommitRecord>,
    /// Merges that failed; each was skipped after resetting the tree
    pub failed: Vec<ReplayFailure>,
}

impl ReplayReport {
    /// Every merge in the chain was replayed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Warm the resolution cache from the merges at the tip of `from..to` (EFFECTFUL)
///
/// Uncommitted changes to tracked files abort the run before anything is
/// touched. The cache is enabled (and optionally cleared) first. Each merge in
/// the chain is replayed independently: a failure is reported, the tree is
/// reset, and the run moves on. HEAD is put back where it was once the chain is done.
///
/// An empty range or a range without merges is a successful no-op.
///
/// # Errors
/// `NotARepository` outside a checkout, `DirtyWorkingTree` when tracked files
/// have local changes, `HistoryUnavailable` when the range cannot be read, or
/// any error from the reset that follows a failed replay.
pub fn warm_resolution_cache(
    repo: &dyn Repository,
    from_ref: &str,
    to_ref: &str,
    options: ReplayOptions,
    progress: &dyn ProgressCallback,
) -> Result<ReplayReport> {
    repo.ensure_repository()?;

    if !options.dry_run {
        let files = repo.uncommitted_files()?;
        if !files.is_empty() {
            return Err(Error::DirtyWorkingTree { files });
        }
        if options.clear_cache {
            progress.on_message("Clearing recorded resolutions");
            repo.clear_resolution_cache()?;
        }
        repo.enable_resolution_cache()?;
    }

    let commits = repo.list_commits_between(from_ref, to_ref)?;
    let chain = find_merge_chain(&commits);
    info!(
        range = %format!("{from_ref}..{to_ref}"),
        commits = commits.len(),
        merges = chain.len(),
        "isolated merge chain"
    );

    let mut report = ReplayReport {
        chain,
        ..ReplayReport::default()
    };

    if report.chain.is_empty() {
        progress.on_message("No merges to replay");
        return Ok(report);
    }

    if options.dry_run {
        for commit in &report.chain {
            progress.on_replay_start(commit);
        }
        return Ok(report);
    }

    let original_head = repo.current_head()?;
    debug!(head = %original_head, "saved HEAD");

    for commit in report.chain.commits().to_vec() {
        progress.on_replay_start(&commit);
        match replay_merge(repo, &commit) {
            Ok(()) => {
                progress.on_replay_trained(&commit);
                report.trained.push(commit);
            }
            Err(error) => {
                warn!(commit = %commit.hash, %error, "replay failed");
                progress.on_replay_failed(&commit, &error);
                repo.reset_working_tree()?;
                report.failed.push(ReplayFailure { commit, error });
            }
        }
    }

    repo.checkout_branch(&original_head)?;
    debug!(head = %original_head, "restored HEAD");

    Ok(report)
}

/// Replay one historical merge and record how it was resolved (EFFECTFUL)
///
/// Checks out the first parent detached, merges the remaining parents, records
/// the conflict state, aligns the tree to the recorded merge result, records
/// again so the resolution is learned, then resets.
///
/// # Errors
/// `ReplayFailed` naming the commit when any step fails. The working tree may
/// be left mid-merge; callers reset it.
pub fn replay_merge(repo: &dyn Repository, commit: &CommitRecord) -> Result<()> {
    let replay_failed = |message: String| Error::ReplayFailed {
        commit: commit.hash.clone(),
        message,
    };

    let first_parent = commit
        .first_parent()
        .ok_or_else(|| replay_failed("commit has no parents".to_string()))?;
    if !commit.is_merge() {
        return Err(replay_failed("commit is not a merge".to_string()));
    }

    repo.checkout_detached(first_parent)
        .map_err(|e| replay_failed(e.to_string()))?;

    match repo
        .merge_for_replay(commit.incoming_parents())
        .map_err(|e| replay_failed(e.to_string()))?
    {
        MergeStatus::Completed => debug!(commit = %commit.hash, "replayed merge cleanly"),
        MergeStatus::Conflicted => debug!(commit = %commit.hash, "replayed merge conflicted"),
        MergeStatus::Failed(message) => return Err(replay_failed(message)),
    }

    repo.record_resolution()
        .map_err(|e| replay_failed(e.to_string()))?;
    repo.align_to_historical_result(&commit.hash)
        .map_err(|e| replay_failed(e.to_string()))?;
    repo.record_resolution()
        .map_err(|e| replay_failed(e.to_string()))?;
    repo.reset_working_tree()
        .map_err(|e| replay_failed(e.to_string()))?;

    Ok(())
}
