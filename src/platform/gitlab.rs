//! GitLab merge request source

use crate::error::Result;
use crate::platform::{PAGE_SIZE, PullRequestSource, get_json, http_client, trim_base, with_remote};
use crate::types::{Platform, PlatformConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// GitLab source using reqwest
pub struct GitLabSource {
    client: Client,
    base_url: String,
    auth_header: String,
    remote: String,
    config: PlatformConfig,
    project_path: String,
}

#[derive(Deserialize)]
struct MergeRequest {
    source_branch: String,
}

impl GitLabSource {
    /// Create a new GitLab source
    pub fn new(
        owner: String,
        repo: String,
        host: Option<String>,
        auth_header: String,
        remote: String,
    ) -> Result<Self> {
        let base_url = format!("https://{}", host.as_deref().unwrap_or("gitlab.com"));
        Self::with_base_url(owner, repo, host, auth_header, remote, &base_url)
    }

    /// Create a source talking to an explicit server root
    pub fn with_base_url(
        owner: String,
        repo: String,
        host: Option<String>,
        auth_header: String,
        remote: String,
        base_url: &str,
    ) -> Result<Self> {
        let project_path = format!("{owner}/{repo}");
        let config_host = host.filter(|h| h != "gitlab.com");

        Ok(Self {
            client: http_client(Platform::GitLab)?,
            base_url: trim_base(base_url),
            auth_header,
            remote,
            config: PlatformConfig {
                platform: Platform::GitLab,
                owner,
                repo,
                host: config_host,
            },
            project_path,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    fn encoded_project(&self) -> String {
        urlencoding::encode(&self.project_path).into_owned()
    }
}

#[async_trait]
impl PullRequestSource for GitLabSource {
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>> {
        debug!(target, "finding GitLab merge requests");
        let url = self.api_url(&format!(
            "/projects/{}/merge_requests",
            self.encoded_project()
        ));

        let mrs: Vec<MergeRequest> = get_json(
            &self.client,
            Platform::GitLab,
            &url,
            &[
                ("state", "opened".to_string()),
                ("target_branch", target.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
            ],
            &self.auth_header,
        )
        .await?;

        debug!(count = mrs.len(), "found GitLab merge requests");
        Ok(with_remote(&self.remote, mrs.into_iter().map(|mr| mr.source_branch)))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
