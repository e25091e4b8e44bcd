//! GitHub pull request source

use crate::error::Result;
use crate::platform::{PAGE_SIZE, PullRequestSource, get_json, http_client, trim_base, with_remote};
use crate::types::{Platform, PlatformConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// GitHub source using reqwest
pub struct GitHubSource {
    client: Client,
    base_url: String,
    auth_header: String,
    remote: String,
    config: PlatformConfig,
}

#[derive(Deserialize)]
struct PullRequest {
    head: HeadRef,
}

#[derive(Deserialize)]
struct HeadRef {
    #[serde(rename = "ref")]
    name: String,
}

impl GitHubSource {
    /// Create a new GitHub source
    ///
    /// A custom `host` is treated as GitHub Enterprise (`https://{host}/api/v3`).
    pub fn new(
        owner: String,
        repo: String,
        host: Option<String>,
        auth_header: String,
        remote: String,
    ) -> Result<Self> {
        let base_url = host.as_deref().map_or_else(
            || "https://api.github.com".to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_base_url(owner, repo, host, auth_header, remote, &base_url)
    }

    /// Create a source talking to an explicit API root
    pub fn with_base_url(
        owner: String,
        repo: String,
        host: Option<String>,
        auth_header: String,
        remote: String,
        base_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(Platform::GitHub)?,
            base_url: trim_base(base_url),
            auth_header,
            remote,
            config: PlatformConfig {
                platform: Platform::GitHub,
                owner,
                repo,
                host,
            },
        })
    }

    fn pulls_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/pulls",
            self.base_url, self.config.owner, self.config.repo
        )
    }
}

#[async_trait]
impl PullRequestSource for GitHubSource {
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>> {
        debug!(target, "finding GitHub pull requests");
        let pulls: Vec<PullRequest> = get_json(
            &self.client,
            Platform::GitHub,
            &self.pulls_url(),
            &[
                ("state", "open".to_string()),
                ("base", target.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
            ],
            &self.auth_header,
        )
        .await?;

        debug!(count = pulls.len(), "found GitHub pull requests");
        Ok(with_remote(&self.remote, pulls.into_iter().map(|p| p.head.name)))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
