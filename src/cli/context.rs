//! Shared discovery context for CLI commands
//!
//! Extracts the setup shared by the discover and build commands.

use clap::Args;
use integration_branch_builder::auth::resolve_auth_header;
use integration_branch_builder::config::{DiscoveryConfig, load_config};
use integration_branch_builder::error::{Error, Result};
use integration_branch_builder::git::{GitRepository, Repository};
use integration_branch_builder::platform::{
    PullRequestSource, create_pull_request_source, parse_repo_info,
};
use integration_branch_builder::types::{Platform, PlatformConfig};
use std::path::Path;
use tracing::{debug, info};

/// Platform flags shared by commands that talk to a hosting platform
#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryArgs {
    /// Hosting platform (detected from the remote URL when omitted)
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// Workspace, project key, owner or group
    #[arg(long)]
    pub owner: Option<String>,

    /// Repository name or slug
    #[arg(long)]
    pub repo: Option<String>,

    /// Custom host (required for Bitbucket Server)
    #[arg(long)]
    pub host: Option<String>,

    /// Git remote whose URL is used for detection and as branch prefix
    #[arg(long)]
    pub remote: Option<String>,
}

impl DiscoveryArgs {
    /// Flags as a config layer
    pub fn to_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            platform: self.platform,
            owner: self.owner.clone(),
            repo: self.repo.clone(),
            host: self.host.clone(),
            remote: self.remote.clone(),
        }
    }
}

/// Shared context for CLI commands that query pull requests
///
/// This struct encapsulates the setup needed by discover and build:
/// - Merging flags over stored config
/// - Detecting the platform from the remote URL when needed
/// - Resolving credentials and creating the source
pub struct DiscoveryContext {
    /// Repository driven through the git CLI
    pub repo: GitRepository,
    /// Platform, owner and repository to query
    pub platform_config: PlatformConfig,
    /// Remote that discovered branches belong to
    pub remote: String,
    /// Pull request source for the platform
    pub source: Box<dyn PullRequestSource>,
}

impl DiscoveryContext {
    /// Create a new discovery context
    ///
    /// Precedence: flags, repository config, user config, then detection
    /// from the remote URL.
    pub async fn new(path: &Path, args: &DiscoveryArgs, auth_header: Option<&str>) -> Result<Self> {
        let repo = GitRepository::new(path);
        let stored = load_config(path)?;
        let merged = args.to_config().or(stored.discovery);
        let remote = merged.remote_or_default().to_string();

        let platform_config = resolve_platform(&repo, &merged, &remote)?;
        debug!(
            platform = %platform_config.platform,
            owner = %platform_config.owner,
            repo = %platform_config.repo,
            "resolved platform"
        );

        let auth = resolve_auth_header(platform_config.platform, auth_header).await?;
        info!(
            platform = %platform_config.platform,
            "using credentials from {}",
            auth.source
        );
        let source = create_pull_request_source(&platform_config, auth.value, &remote)?;

        Ok(Self {
            repo,
            platform_config,
            remote,
            source,
        })
    }
}

/// Fill platform settings, detecting from the remote URL only when incomplete
fn resolve_platform(
    repo: &dyn Repository,
    merged: &DiscoveryConfig,
    remote: &str,
) -> Result<PlatformConfig> {
    if let (Some(platform), Some(owner), Some(name)) = (merged.platform, &merged.owner, &merged.repo)
    {
        return Ok(PlatformConfig {
            platform,
            owner: owner.clone(),
            repo: name.clone(),
            host: merged.host.clone(),
        });
    }

    let url = repo.remote_url(remote)?;
    let detected = parse_repo_info(&url)?;
    if let Some(platform) = merged.platform
        && platform != detected.platform
        && (merged.owner.is_none() || merged.repo.is_none())
    {
        return Err(Error::Config(format!(
            "remote {remote} looks like {}, not {platform}; pass --owner and --repo",
            detected.platform
        )));
    }

    Ok(PlatformConfig {
        platform: merged.platform.unwrap_or(detected.platform),
        owner: merged.owner.clone().unwrap_or(detected.owner),
        repo: merged.repo.clone().unwrap_or(detected.repo),
        host: merged.host.clone().or(detected.host),
    })
}
