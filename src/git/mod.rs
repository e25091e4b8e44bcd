//! Version-control collaborator
//!
//! The replay and topic-merge engines only talk to [`Repository`]. The git
//! implementation shells out to the `git` binary with argument vectors.

mod command;
mod history;
mod repository;

pub use command::{GitOutput, check_ref, run_git, run_git_output};
pub use history::{list_commits_between, parse_rev_list};
pub use repository::GitRepository;

use crate::error::Result;
use crate::types::{CommitRecord, MergeStatus};

/// Narrow interface over the working tree, index and resolution cache
///
/// Every method blocks until the underlying command exits. Implementations
/// assume a single caller per checkout.
pub trait Repository: Send + Sync {
    /// Fail with `NotARepository` unless this is a version-controlled checkout
    fn ensure_repository(&self) -> Result<()>;

    /// Commits reachable from `to_ref` and not from `from_ref`, newest first
    fn list_commits_between(&self, from_ref: &str, to_ref: &str) -> Result<Vec<CommitRecord>>;

    /// Tracked files with staged or unstaged changes; untracked files are ignored
    fn uncommitted_files(&self) -> Result<Vec<String>>;

    /// Current branch name, or the commit hash when HEAD is detached
    fn current_head(&self) -> Result<String>;

    /// Check out a branch (or any ref) so that HEAD follows it
    fn checkout_branch(&self, branch: &str) -> Result<()>;

    /// Check out a commit without moving any branch
    fn checkout_detached(&self, commit: &str) -> Result<()>;

    /// Create or reset `branch` to `start_point` and check it out
    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()>;

    /// Fetch from a remote
    fn fetch(&self, remote: &str) -> Result<()>;

    /// URL configured for a remote
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Merge `incoming` into the detached working tree without committing
    fn merge_for_replay(&self, incoming: &[String]) -> Result<MergeStatus>;

    /// Record the current conflict state (or its resolution) into the cache
    fn record_resolution(&self) -> Result<()>;

    /// Overwrite the working tree and index with the tree of `commit`
    fn align_to_historical_result(&self, commit: &str) -> Result<()>;

    /// Discard all working tree and index changes
    fn reset_working_tree(&self) -> Result<()>;

    /// Merge a topic branch onto HEAD, reusing recorded resolutions, never fast-forwarding
    fn merge_topic(&self, branch: &str) -> Result<MergeStatus>;

    /// Files with unstaged changes in the working tree
    fn unstaged_files(&self) -> Result<Vec<String>>;

    /// Unified diff of the unstaged changes, with extended context
    fn conflict_diff(&self) -> Result<String>;

    /// Conclude an in-progress merge with its prepared message
    fn commit_merge(&self) -> Result<()>;

    /// Make sure the resolution cache is switched on
    fn enable_resolution_cache(&self) -> Result<()>;

    /// Delete every recorded resolution
    fn clear_resolution_cache(&self) -> Result<()>;
}
