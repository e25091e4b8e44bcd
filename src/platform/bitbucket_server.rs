//! Bitbucket Server (Data Center) pull request source

use crate::error::Result;
use crate::platform::{PAGE_SIZE, PullRequestSource, get_json, http_client, trim_base, with_remote};
use crate::types::{Platform, PlatformConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Bitbucket Server source using reqwest
pub struct BitbucketServerSource {
    client: Client,
    base_url: String,
    auth_header: String,
    remote: String,
    config: PlatformConfig,
}

#[derive(Deserialize)]
struct PullRequestPage {
    #[serde(default)]
    values: Vec<PullRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequest {
    from_ref: FromRef,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FromRef {
    display_id: String,
}

impl BitbucketServerSource {
    /// Create a new Bitbucket Server source
    ///
    /// `host` is the server root, with or without scheme (`https://` is assumed).
    pub fn new(
        host: &str,
        project_key: String,
        repo: String,
        auth_header: String,
        remote: String,
    ) -> Result<Self> {
        let base_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        Ok(Self {
            client: http_client(Platform::BitbucketServer)?,
            base_url: trim_base(&base_url),
            auth_header,
            remote,
            config: PlatformConfig {
                platform: Platform::BitbucketServer,
                owner: project_key,
                repo,
                host: Some(host.to_string()),
            },
        })
    }

    fn pull_requests_url(&self) -> String {
        format!(
            "{}/rest/api/1.0/projects/{}/repos/{}/pull-requests",
            self.base_url,
            urlencoding::encode(&self.config.owner),
            urlencoding::encode(&self.config.repo)
        )
    }
}

#[async_trait]
impl PullRequestSource for BitbucketServerSource {
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>> {
        debug!(target, "finding Bitbucket Server pull requests");
        let page: PullRequestPage = get_json(
            &self.client,
            Platform::BitbucketServer,
            &self.pull_requests_url(),
            &[
                ("state", "OPEN".to_string()),
                ("order", "OLDEST".to_string()),
                ("at", format!("refs/heads/{target}")),
                ("limit", PAGE_SIZE.to_string()),
            ],
            &self.auth_header,
        )
        .await?;

        debug!(count = page.values.len(), "found Bitbucket Server pull requests");
        Ok(with_remote(
            &self.remote,
            page.values.into_iter().map(|pr| pr.from_ref.display_id),
        ))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
