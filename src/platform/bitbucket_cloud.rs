//! Bitbucket Cloud pull request source

use crate::error::Result;
use crate::platform::{PAGE_SIZE, PullRequestSource, get_json, http_client, trim_base, with_remote};
use crate::types::{Platform, PlatformConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_API_URL: &str = "https://api.bitbucket.org";

/// Bitbucket Cloud source using reqwest
pub struct BitbucketCloudSource {
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
struct PullRequest {
    source: Endpoint,
}

#[derive(Deserialize)]
struct Endpoint {
    branch: BranchRef,
}

#[derive(Deserialize)]
struct BranchRef {
    name: String,
}

impl BitbucketCloudSource {
    /// Create a new Bitbucket Cloud source for `workspace/repo`
    pub fn new(
        workspace: String,
        repo: String,
        auth_header: String,
        remote: String,
    ) -> Result<Self> {
        Self::with_base_url(workspace, repo, auth_header, remote, DEFAULT_API_URL)
    }

    /// Create a source talking to an explicit API root
    pub fn with_base_url(
        workspace: String,
        repo: String,
        auth_header: String,
        remote: String,
        base_url: &str,
    ) -> Result<Self> {
        Ok(Self {
            client: http_client(Platform::BitbucketCloud)?,
            base_url: trim_base(base_url),
            auth_header,
            remote,
            config: PlatformConfig {
                platform: Platform::BitbucketCloud,
                owner: workspace,
                repo,
                host: None,
            },
        })
    }

    fn pull_requests_url(&self) -> String {
        format!(
            "{}/2.0/repositories/{}/{}/pullrequests",
            self.base_url,
            urlencoding::encode(&self.config.owner),
            urlencoding::encode(&self.config.repo)
        )
    }
}

/// BBQL filter for open pull requests into `target`
fn open_into(target: &str) -> String {
    let escaped = target.replace('\\', "\\\\").replace('"', "\\\"");
    format!("state=\"OPEN\" AND destination.branch.name=\"{escaped}\"")
}

#[async_trait]
impl PullRequestSource for BitbucketCloudSource {
    async fn branches_targeting(&self, target: &str) -> Result<Vec<String>> {
        debug!(target, "finding Bitbucket Cloud pull requests");
        let page: PullRequestPage = get_json(
            &self.client,
            Platform::BitbucketCloud,
            &self.pull_requests_url(),
            &[
                ("q", open_into(target)),
                ("fields", "values.source.branch.name".to_string()),
                ("pagelen", PAGE_SIZE.to_string()),
            ],
            &self.auth_header,
        )
        .await?;

        debug!(count = page.values.len(), "found Bitbucket Cloud pull requests");
        Ok(with_remote(
            &self.remote,
            page.values.into_iter().map(|pr| pr.source.branch.name),
        ))
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use mockito::Matcher;

    fn source(base_url: &str) -> BitbucketCloudSource {
        BitbucketCloudSource::with_base_url(
            "acme".to_string(),
            "shop".to_string(),
            "Basic dXNlcjpwYXNz".to_string(),
            "origin".to_string(),
            base_url,
        )
        .unwrap()
    }

    #[test]
    fn test_filter_query() {
        assert_eq!(
            open_into("release/1.0"),
            r#"state="OPEN" AND destination.branch.name="release/1.0""#
        );
        assert_eq!(
            open_into(r#"we"ird"#),
            r#"state="OPEN" AND destination.branch.name="we\"ird""#
        );
    }

    #[tokio::test]
    async fn test_lists_source_branches() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2.0/repositories/acme/shop/pullrequests")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded(
                    "q".into(),
                    r#"state="OPEN" AND destination.branch.name="integration""#.into(),
                ),
                Matcher::UrlEncoded("fields".into(), "values.source.branch.name".into()),
                Matcher::UrlEncoded("pagelen".into(), "50".into()),
            ]))
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .with_status(200)
            .with_body(
                r#"{"values":[{"source":{"branch":{"name":"feature/x"}}},{"source":{"branch":{"name":"feature/y"}}}]}"#,
            )
            .create_async()
            .await;

        let branches = source(&server.url())
            .branches_targeting("integration")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(branches, vec!["origin/feature/x", "origin/feature/y"]);
    }

    #[tokio::test]
    async fn test_empty_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/repositories/acme/shop/pullrequests")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"values":[]}"#)
            .create_async()
            .await;

        let branches = source(&server.url())
            .branches_targeting("integration")
            .await
            .unwrap();
        assert!(branches.is_empty());
    }

    #[tokio::test]
    async fn test_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/2.0/repositories/acme/shop/pullrequests")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;

        let err = source(&server.url())
            .branches_targeting("integration")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DiscoveryFailed {
                platform: Platform::BitbucketCloud,
                status: 404
            }
        ));
        assert_eq!(
            err.to_string(),
            "Bitbucket Cloud pull requests API returned non-success response: 404"
        );
    }
}
