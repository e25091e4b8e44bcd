//! Discovery defaults stored per repository
//!
//! Settings live in `<git-dir>/ibb/config.toml`, with a user-level file as a
//! fallback. Command-line flags always win over both.

mod storage;

pub use storage::{
    config_path, load_config, load_config_file, resolve_git_dir, save_config, user_config_path,
};

use crate::types::Platform;
use serde::{Deserialize, Serialize};

/// Remote used when none is configured
pub const DEFAULT_REMOTE: &str = "origin";

/// Top-level config file contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Pull request discovery defaults
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// `[discovery]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Hosting platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Workspace, project key, owner or group path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Repository name or slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    /// Custom host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Remote that discovered branches are prefixed with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

impl DiscoveryConfig {
    /// Fill unset fields from `fallback`
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        Self {
            platform: self.platform.or(fallback.platform),
            owner: self.owner.or(fallback.owner),
            repo: self.repo.or(fallback.repo),
            host: self.host.or(fallback.host),
            remote: self.remote.or(fallback.remote),
        }
    }

    /// Configured remote, or `origin`
    pub fn remote_or_default(&self) -> &str {
        self.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    /// Nothing is set
    pub const fn is_empty(&self) -> bool {
        self.platform.is_none()
            && self.owner.is_none()
            && self.repo.is_none()
            && self.host.is_none()
            && self.remote.is_none()
    }
}
