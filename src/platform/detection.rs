//! Platform detection from git remote URLs

use crate::error::{Error, Result};
use crate::types::{Platform, PlatformConfig};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `user@host:path` remotes that carry no scheme
static SCP_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^@/]+@)?([^:/]+):(.+)$").expect("valid regex"));

/// Split a remote URL into host and repository path
fn split_remote(url: &str) -> Option<(String, String)> {
    let (host, path) = if url.contains("://") {
        let parsed = Url::parse(url).ok()?;
        (parsed.host_str()?.to_string(), parsed.path().to_string())
    } else {
        let caps = SCP_LIKE.captures(url)?;
        (caps[1].to_string(), caps[2].to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some((host.to_lowercase(), path.to_string()))
}

/// Detect the hosting platform of a remote URL
pub fn detect_platform(url: &str) -> Option<Platform> {
    let (host, path) = split_remote(url)?;
    platform_for(&host, &path)
}

fn platform_for(host: &str, path: &str) -> Option<Platform> {
    match host {
        "github.com" => Some(Platform::GitHub),
        "gitlab.com" => Some(Platform::GitLab),
        "bitbucket.org" => Some(Platform::BitbucketCloud),
        h if h.contains("github") => Some(Platform::GitHub),
        h if h.contains("gitlab") => Some(Platform::GitLab),
        h if h.contains("bitbucket") || path.starts_with("scm/") => Some(Platform::BitbucketServer),
        _ => None,
    }
}

/// Parse platform, owner and repository from a remote URL
///
/// Supports HTTPS and SSH remotes for bitbucket.org, github.com and gitlab.com,
/// plus self-hosted GitHub, GitLab and Bitbucket Server instances whose host
/// name gives them away. GitLab owners may be nested group paths.
///
/// # Errors
/// `NoSupportedRemotes` when the URL matches no supported platform.
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let (host, path) = split_remote(url).ok_or(Error::NoSupportedRemotes)?;
    let platform = platform_for(&host, &path).ok_or(Error::NoSupportedRemotes)?;

    let path = match platform {
        Platform::BitbucketServer => path.strip_prefix("scm/").unwrap_or(&path),
        _ => path.as_str(),
    };
    let (owner, repo) = path.rsplit_once('/').ok_or(Error::NoSupportedRemotes)?;
    if owner.is_empty() || repo.is_empty() {
        return Err(Error::NoSupportedRemotes);
    }
    if owner.contains('/') && platform != Platform::GitLab {
        return Err(Error::NoSupportedRemotes);
    }

    let host = match (platform, host.as_str()) {
        (Platform::GitHub, "github.com")
        | (Platform::GitLab, "gitlab.com")
        | (Platform::BitbucketCloud, _) => None,
        _ => Some(host),
    };

    Ok(PlatformConfig {
        platform,
        owner: owner.to_string(),
        repo: repo.to_string(),
        host,
    })
}
