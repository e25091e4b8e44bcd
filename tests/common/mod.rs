//! Shared test utilities

#![allow(dead_code, unused_imports)]

mod mock_repository;
mod mock_source;
mod temp_repo;

pub use mock_repository::{MockRepository, RepoCall};
pub use mock_source::{MockPullRequestSource, bitbucket_config};
pub use temp_repo::TempGitRepo;

use integration_branch_builder::types::{CommitRecord, TopicMergeRequest};

/// A commit with the given parents
pub fn commit(hash: &str, parents: &[&str]) -> CommitRecord {
    CommitRecord::new(hash, parents.iter().map(ToString::to_string).collect())
}

/// A topic merge request onto `target`
pub fn request(target: &str, topics: &[&str]) -> TopicMergeRequest {
    TopicMergeRequest::new(target, topics.iter().map(ToString::to_string).collect())
}
