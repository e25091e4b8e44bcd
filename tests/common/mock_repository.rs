//! Mock repository for testing the replay and topic merge engines
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use integration_branch_builder::error::{Error, Result};
use integration_branch_builder::git::Repository;
use integration_branch_builder::types::{CommitRecord, MergeStatus};
use std::collections::HashMap;
use std::sync::Mutex;

/// One call made against the mock, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    EnsureRepository,
    ListCommits { from: String, to: String },
    UncommittedFiles,
    CurrentHead,
    Checkout(String),
    CheckoutDetached(String),
    CreateBranch { branch: String, start_point: String },
    Fetch(String),
    RemoteUrl(String),
    MergeForReplay(Vec<String>),
    RecordResolution,
    Align(String),
    Reset,
    MergeTopic(String),
    UnstagedFiles,
    ConflictDiff,
    CommitMerge,
    EnableCache,
    ClearCache,
}

/// Scripted result of merging one topic branch
#[derive(Debug, Clone)]
struct TopicScript {
    status: MergeStatus,
    unstaged: Vec<String>,
}

/// Simple mock repository for testing
///
/// Features:
/// - Scripted history and merge outcomes
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockRepository {
    commits: Mutex<Vec<CommitRecord>>,
    head: Mutex<String>,
    remote_urls: Mutex<HashMap<String, String>>,
    replay_statuses: Mutex<HashMap<String, MergeStatus>>,
    topic_scripts: Mutex<HashMap<String, TopicScript>>,
    unstaged: Mutex<Vec<String>>,
    uncommitted: Mutex<Vec<String>>,
    calls: Mutex<Vec<RepoCall>>,
    // Error injection
    not_a_repository: Mutex<bool>,
    error_on_history: Mutex<Option<String>>,
    error_on_align: Mutex<Option<String>>,
    error_on_reset: Mutex<Option<String>>,
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRepository {
    /// Create a mock on branch `main` with empty history
    pub fn new() -> Self {
        Self {
            commits: Mutex::new(Vec::new()),
            head: Mutex::new("main".to_string()),
            remote_urls: Mutex::new(HashMap::new()),
            replay_statuses: Mutex::new(HashMap::new()),
            topic_scripts: Mutex::new(HashMap::new()),
            unstaged: Mutex::new(Vec::new()),
            uncommitted: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            not_a_repository: Mutex::new(false),
            error_on_history: Mutex::new(None),
            error_on_align: Mutex::new(None),
            error_on_reset: Mutex::new(None),
        }
    }

    /// Create a mock whose history query returns `commits`
    pub fn with_history(commits: Vec<CommitRecord>) -> Self {
        let mock = Self::new();
        *mock.commits.lock().unwrap() = commits;
        mock
    }

    // === Scripting ===

    /// Set the branch reported by `current_head`
    pub fn set_head(&self, head: &str) {
        *self.head.lock().unwrap() = head.to_string();
    }

    /// Set the URL reported for a remote
    pub fn set_remote_url(&self, remote: &str, url: &str) {
        self.remote_urls
            .lock()
            .unwrap()
            .insert(remote.to_string(), url.to_string());
    }

    /// Report local changes to these tracked files
    pub fn set_uncommitted(&self, files: &[&str]) {
        *self.uncommitted.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    /// Script the replay merge whose first incoming parent is `parent`
    pub fn set_replay_status(&self, parent: &str, status: MergeStatus) {
        self.replay_statuses
            .lock()
            .unwrap()
            .insert(parent.to_string(), status);
    }

    /// Topic merges cleanly (the default)
    pub fn merge_clean(&self, branch: &str) {
        self.script_topic(branch, MergeStatus::Completed, &[]);
    }

    /// Topic conflicts but rerere settles everything
    pub fn merge_cache_resolved(&self, branch: &str) {
        self.script_topic(branch, MergeStatus::Conflicted, &[]);
    }

    /// Topic conflicts and leaves these files unstaged
    pub fn merge_unresolved(&self, branch: &str, files: &[&str]) {
        self.script_topic(branch, MergeStatus::Conflicted, files);
    }

    /// Topic merge fails outright
    pub fn merge_fails(&self, branch: &str, message: &str) {
        self.script_topic(branch, MergeStatus::Failed(message.to_string()), &[]);
    }

    fn script_topic(&self, branch: &str, status: MergeStatus, unstaged: &[&str]) {
        self.topic_scripts.lock().unwrap().insert(
            branch.to_string(),
            TopicScript {
                status,
                unstaged: unstaged.iter().map(ToString::to_string).collect(),
            },
        );
    }

    // === Error injection methods ===

    /// Make `ensure_repository` fail
    pub fn fail_not_a_repository(&self) {
        *self.not_a_repository.lock().unwrap() = true;
    }

    /// Make `list_commits_between` fail
    pub fn fail_history(&self, msg: &str) {
        *self.error_on_history.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `align_to_historical_result` fail for one commit
    pub fn fail_align_for(&self, commit: &str) {
        *self.error_on_align.lock().unwrap() = Some(commit.to_string());
    }

    /// Make `reset_working_tree` fail
    pub fn fail_reset(&self, msg: &str) {
        *self.error_on_reset.lock().unwrap() = Some(msg.to_string());
    }

    // === Call inspection ===

    /// Every call, in order
    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Topic branches `merge_topic` was called with
    pub fn merged_topics(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::MergeTopic(branch) => Some(branch),
                _ => None,
            })
            .collect()
    }

    /// Commits replayed (by the detached checkout of their first parent)
    pub fn replay_merges(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::MergeForReplay(parents) => Some(parents),
                _ => None,
            })
            .collect()
    }

    /// Number of times a call was made
    pub fn count(&self, call: &RepoCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Assert no state-changing call was made
    pub fn assert_untouched(&self) {
        let mutating: Vec<RepoCall> = self
            .calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    RepoCall::EnsureRepository
                        | RepoCall::ListCommits { .. }
                        | RepoCall::UncommittedFiles
                        | RepoCall::CurrentHead
                        | RepoCall::RemoteUrl(_)
                        | RepoCall::UnstagedFiles
                        | RepoCall::ConflictDiff
                )
            })
            .collect();
        assert!(mutating.is_empty(), "unexpected mutations: {mutating:?}");
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Repository for MockRepository {
    fn ensure_repository(&self) -> Result<()> {
        self.record(RepoCall::EnsureRepository);
        if *self.not_a_repository.lock().unwrap() {
            return Err(Error::NotARepository("/mock".to_string()));
        }
        Ok(())
    }

    fn list_commits_between(&self, from_ref: &str, to_ref: &str) -> Result<Vec<CommitRecord>> {
        self.record(RepoCall::ListCommits {
            from: from_ref.to_string(),
            to: to_ref.to_string(),
        });
        if let Some(message) = self.error_on_history.lock().unwrap().clone() {
            return Err(Error::HistoryUnavailable {
                range: format!("{from_ref}..{to_ref}"),
                message,
            });
        }
        Ok(self.commits.lock().unwrap().clone())
    }

    fn uncommitted_files(&self) -> Result<Vec<String>> {
        self.record(RepoCall::UncommittedFiles);
        Ok(self.uncommitted.lock().unwrap().clone())
    }

    fn current_head(&self) -> Result<String> {
        self.record(RepoCall::CurrentHead);
        Ok(self.head.lock().unwrap().clone())
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        self.record(RepoCall::Checkout(branch.to_string()));
        Ok(())
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        self.record(RepoCall::CheckoutDetached(commit.to_string()));
        Ok(())
    }

    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        self.record(RepoCall::CreateBranch {
            branch: branch.to_string(),
            start_point: start_point.to_string(),
        });
        Ok(())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.record(RepoCall::Fetch(remote.to_string()));
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.record(RepoCall::RemoteUrl(remote.to_string()));
        self.remote_urls
            .lock()
            .unwrap()
            .get(remote)
            .cloned()
            .ok_or_else(|| Error::Command {
                message: format!("Could not read URL of remote {remote}."),
                command: format!("git remote get-url {remote}"),
                stderr: "No such remote".to_string(),
            })
    }

    fn merge_for_replay(&self, incoming: &[String]) -> Result<MergeStatus> {
        self.record(RepoCall::MergeForReplay(incoming.to_vec()));
        let status = incoming
            .first()
            .and_then(|p| self.replay_statuses.lock().unwrap().get(p).cloned())
            .unwrap_or(MergeStatus::Completed);
        Ok(status)
    }

    fn record_resolution(&self) -> Result<()> {
        self.record(RepoCall::RecordResolution);
        Ok(())
    }

    fn align_to_historical_result(&self, commit: &str) -> Result<()> {
        self.record(RepoCall::Align(commit.to_string()));
        if self.error_on_align.lock().unwrap().as_deref() == Some(commit) {
            return Err(Error::Command {
                message: "Unable to check out merge resolution.".to_string(),
                command: format!("git checkout {commit} -- ."),
                stderr: String::new(),
            });
        }
        Ok(())
    }

    fn reset_working_tree(&self) -> Result<()> {
        self.record(RepoCall::Reset);
        if let Some(message) = self.error_on_reset.lock().unwrap().clone() {
            return Err(Error::Command {
                message,
                command: "git reset --hard".to_string(),
                stderr: String::new(),
            });
        }
        self.unstaged.lock().unwrap().clear();
        Ok(())
    }

    fn merge_topic(&self, branch: &str) -> Result<MergeStatus> {
        self.record(RepoCall::MergeTopic(branch.to_string()));
        let script = self
            .topic_scripts
            .lock()
            .unwrap()
            .get(branch)
            .cloned()
            .unwrap_or(TopicScript {
                status: MergeStatus::Completed,
                unstaged: Vec::new(),
            });
        *self.unstaged.lock().unwrap() = script.unstaged;
        Ok(script.status)
    }

    fn unstaged_files(&self) -> Result<Vec<String>> {
        self.record(RepoCall::UnstagedFiles);
        Ok(self.unstaged.lock().unwrap().clone())
    }

    fn conflict_diff(&self) -> Result<String> {
        self.record(RepoCall::ConflictDiff);
        let files = self.unstaged.lock().unwrap().clone();
        Ok(files
            .iter()
            .map(|f| format!("diff --cc {f}\n<<<<<<< ours\n=======\n>>>>>>> theirs"))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn commit_merge(&self) -> Result<()> {
        self.record(RepoCall::CommitMerge);
        Ok(())
    }

    fn enable_resolution_cache(&self) -> Result<()> {
        self.record(RepoCall::EnableCache);
        Ok(())
    }

    fn clear_resolution_cache(&self) -> Result<()> {
        self.record(RepoCall::ClearCache);
        Ok(())
    }
}
