//! Core types for integration-branch-builder

use serde::{Deserialize, Serialize};

/// A commit read from history, with its parents in recorded order
///
/// The first parent is the branch that was merged into; any further parents
/// are the incoming branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash
    pub hash: String,
    /// Parent hashes in recorded order
    pub parent_hashes: Vec<String>,
}

impl CommitRecord {
    /// Create a record from a hash and its parents
    pub fn new(hash: impl Into<String>, parent_hashes: Vec<String>) -> Self {
        Self {
            hash: hash.into(),
            parent_hashes,
        }
    }

    /// Two or more parents
    pub const fn is_merge(&self) -> bool {
        self.parent_hashes.len() >= 2
    }

    /// No parents
    pub const fn is_root(&self) -> bool {
        self.parent_hashes.is_empty()
    }

    /// The parent that was merged into
    pub fn first_parent(&self) -> Option<&str> {
        self.parent_hashes.first().map(String::as_str)
    }

    /// Parents that were merged in (everything after the first)
    pub fn incoming_parents(&self) -> &[String] {
        self.parent_hashes.get(1..).unwrap_or_default()
    }

    /// Abbreviated hash for display
    pub fn short_hash(&self) -> &str {
        self.hash.get(..10).unwrap_or(&self.hash)
    }
}

/// A maximal run of merge commits at the tip of a commit range (newest first)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeChain {
    commits: Vec<CommitRecord>,
}

impl MergeChain {
    /// Wrap an already-isolated run of merges
    pub const fn new(commits: Vec<CommitRecord>) -> Self {
        Self { commits }
    }

    /// Merges in the chain, newest first
    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    /// Number of merges
    pub const fn len(&self) -> usize {
        self.commits.len()
    }

    /// No merges were found
    pub const fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Iterate newest first
    pub fn iter(&self) -> std::slice::Iter<'_, CommitRecord> {
        self.commits.iter()
    }
}

impl<'a> IntoIterator for &'a MergeChain {
    type Item = &'a CommitRecord;
    type IntoIter = std::slice::Iter<'a, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}

/// Terminal classification of one topic merge attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// Merged without conflicts
    Clean,
    /// Conflicted, but every conflict was settled from recorded resolutions
    CacheResolved,
    /// Conflicts remain that need a human
    Unresolved,
}

impl ResolutionOutcome {
    /// Whether the chain may advance past this merge
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Clean | Self::CacheResolved)
    }
}

impl std::fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::CacheResolved => write!(f, "resolved from cache"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Status reported by the version-control tool for one merge invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeStatus {
    /// The merge command exited successfully
    Completed,
    /// The merge command stopped with the merge still in progress
    Conflicted,
    /// The merge command failed without entering a merge
    Failed(String),
}

/// Request to merge topic branches onto a target branch, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMergeRequest {
    /// Branch receiving the merges
    pub target_branch: String,
    /// Topic branches, merged in list order
    pub topic_branches: Vec<String>,
}

impl TopicMergeRequest {
    /// Create a request
    pub fn new(target_branch: impl Into<String>, topic_branches: Vec<String>) -> Self {
        Self {
            target_branch: target_branch.into(),
            topic_branches,
        }
    }
}

/// Supported hosting platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    /// bitbucket.org
    BitbucketCloud,
    /// Self-hosted Bitbucket Server / Data Center
    BitbucketServer,
    /// GitHub or GitHub Enterprise
    #[serde(rename = "github")]
    #[value(name = "github")]
    GitHub,
    /// GitLab or self-hosted GitLab
    #[serde(rename = "gitlab")]
    #[value(name = "gitlab")]
    GitLab,
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BitbucketCloud => write!(f, "Bitbucket Cloud"),
            Self::BitbucketServer => write!(f, "Bitbucket Server"),
            Self::GitHub => write!(f, "GitHub"),
            Self::GitLab => write!(f, "GitLab"),
        }
    }
}

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Platform type
    pub platform: Platform,
    /// Workspace, project key, owner or group path
    pub owner: String,
    /// Repository name or slug
    pub repo: String,
    /// Custom host (required for Bitbucket Server)
    pub host: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord::new(hash, parents.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_commit_kinds() {
        assert!(commit("c1", &[]).is_root());
        assert!(!commit("c2", &["c1"]).is_merge());
        assert!(commit("c3", &["c2", "c1"]).is_merge());
        assert!(commit("c4", &["c3", "c2", "c1"]).is_merge());
    }

    #[test]
    fn test_incoming_parents() {
        let octopus = commit("m", &["p1", "p2", "p3"]);
        assert_eq!(octopus.first_parent(), Some("p1"));
        assert_eq!(octopus.incoming_parents(), ["p2", "p3"]);
        assert!(commit("root", &[]).incoming_parents().is_empty());
    }

    #[test]
    fn test_short_hash() {
        let c = commit("0123456789abcdef", &[]);
        assert_eq!(c.short_hash(), "0123456789");
        assert_eq!(commit("abc", &[]).short_hash(), "abc");
    }

    #[test]
    fn test_outcome_success() {
        assert!(ResolutionOutcome::Clean.is_success());
        assert!(ResolutionOutcome::CacheResolved.is_success());
        assert!(!ResolutionOutcome::Unresolved.is_success());
    }
}
