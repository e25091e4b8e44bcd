//! Pull request discovery for Bitbucket Cloud, Bitbucket Server, GitHub and GitLab
//!
//! Provides a unified interface for listing the source branches of open pull
//! requests that target a given branch.

mod bitbucket_cloud;
mod bitbucket_server;
mod detection;
mod factory;
mod github;
mod gitlab;

pub use bitbucket_cloud::BitbucketCloudSource;
pub use bitbucket_server::BitbucketServerSource;
pub use detection::{detect_platform, parse_repo_info};
pub use factory::create_pull_request_source;
pub use github::GitHubSource;
pub use gitlab::GitLabSource;

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Maximum number of pull requests read per discovery call
pub const PAGE_SIZE: u32 = 50;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Pull request source trait for branch discovery
///
/// This trait abstracts the hosting platforms, allowing the build command to
/// feed the topic merge engine from any of them.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Source branches of open pull requests targeting `target`, in API order
    ///
    /// Each name carries the remote prefix, e.g. `origin/feature/a`.
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}

/// Build the HTTP client shared by every platform
pub(crate) fn http_client(platform: Platform) -> Result<Client> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::PlatformApi {
            platform,
            message: format!("failed to create HTTP client: {e}"),
        })
}

/// Issue one authorized GET and decode the JSON body
///
/// Anything but 200 is a `DiscoveryFailed` carrying the status code.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    platform: Platform,
    url: &str,
    query: &[(&str, String)],
    auth_header: &str,
) -> Result<T> {
    debug!(%platform, url, "requesting pull requests");
    let response = client
        .get(url)
        .header(reqwest::header::AUTHORIZATION, auth_header)
        .query(query)
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!(%platform, status = status.as_u16(), "pull requests request failed");
        return Err(Error::DiscoveryFailed {
            platform,
            status: status.as_u16(),
        });
    }

    response.json().await.map_err(|e| Error::PlatformApi {
        platform,
        message: format!("unexpected response body: {e}"),
    })
}

/// Prefix each branch with its remote
pub(crate) fn with_remote(remote: &str, branches: impl IntoIterator<Item = String>) -> Vec<String> {
    branches
        .into_iter()
        .map(|branch| format!("{remote}/{branch}"))
        .collect()
}

/// Strip a trailing slash so paths can be appended
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
