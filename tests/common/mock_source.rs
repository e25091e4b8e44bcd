//! Mock pull request source for testing

#![allow(dead_code)]

use async_trait::async_trait;
use integration_branch_builder::error::{Error, Result};
use integration_branch_builder::platform::PullRequestSource;
use integration_branch_builder::types::{Platform, PlatformConfig};
use std::sync::Mutex;

/// Pull request source returning canned branch names
pub struct MockPullRequestSource {
    config: PlatformConfig,
    branches: Vec<String>,
    fail_status: Option<u16>,
    calls: Mutex<Vec<String>>,
}

impl MockPullRequestSource {
    /// Source returning `branches` for every target
    pub fn returning(branches: &[&str]) -> Self {
        Self {
            config: bitbucket_config(),
            branches: branches.iter().map(ToString::to_string).collect(),
            fail_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Source whose API answers with a non-success status
    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::returning(&[])
        }
    }

    /// Targets queried, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestSource for MockPullRequestSource {
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>> {
        self.calls.lock().unwrap().push(target.to_string());
        if let Some(status) = self.fail_status {
            return Err(Error::DiscoveryFailed {
                platform: self.config.platform,
                status,
            });
        }
        Ok(self.branches.clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

/// Bitbucket Cloud config used by the mock
pub fn bitbucket_config() -> PlatformConfig {
    PlatformConfig {
        platform: Platform::BitbucketCloud,
        owner: "acme".to_string(),
        repo: "shop".to_string(),
        host: None,
    }
}
