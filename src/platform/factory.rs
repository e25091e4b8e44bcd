//! Construct the pull request source for a platform

use crate::error::{Error, Result};
use crate::platform::{
    BitbucketCloudSource, BitbucketServerSource, GitHubSource, GitLabSource, PullRequestSource,
};
use crate::types::{Platform, PlatformConfig};

/// Create the pull request source for `config`
///
/// Discovered branch names are prefixed with `remote`.
///
/// # Errors
/// `Config` when Bitbucket Server is selected without a host, or any error
/// building the HTTP client.
pub fn create_pull_request_source(
    config: &PlatformConfig,
    auth_header: String,
    remote: &str,
) -> Result<Box<dyn PullRequestSource>> {
    let owner = config.owner.clone();
    let repo = config.repo.clone();
    let remote = remote.to_string();

    Ok(match config.platform {
        Platform::BitbucketCloud => {
            Box::new(BitbucketCloudSource::new(owner, repo, auth_header, remote)?)
        }
        Platform::BitbucketServer => {
            let host = config.host.as_deref().ok_or_else(|| {
                Error::Config("Bitbucket Server needs a host (--host)".to_string())
            })?;
            Box::new(BitbucketServerSource::new(
                host,
                owner,
                repo,
                auth_header,
                remote,
            )?)
        }
        Platform::GitHub => Box::new(GitHubSource::new(
            owner,
            repo,
            config.host.clone(),
            auth_header,
            remote,
        )?),
        Platform::GitLab => Box::new(GitLabSource::new(
            owner,
            repo,
            config.host.clone(),
            auth_header,
            remote,
        )?),
    })
}
