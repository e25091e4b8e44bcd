//! Authentication for pull request APIs
//!
//! Supports an explicit header value, environment variables, and CLI-based
//! auth (gh) for GitHub.

mod cli;

pub use cli::get_gh_token;

use crate::error::{Error, Result};
use crate::types::Platform;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;

/// Environment variable holding a complete `Authorization` header value
pub const AUTH_HEADER_ENV: &str = "IBB_AUTH_HEADER";

/// Source of authentication header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Passed on the command line
    Flag,
    /// Token from environment variable
    EnvVar,
    /// Token from CLI tool (gh)
    Cli,
}

impl std::fmt::Display for AuthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag => write!(f, "--auth-header"),
            Self::EnvVar => write!(f, "environment"),
            Self::Cli => write!(f, "gh CLI"),
        }
    }
}

/// A resolved `Authorization` header value
#[derive(Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Full header value, e.g. `Bearer abc` or `Basic dXNlcjpwYXNz`
    pub value: String,
    /// Where it came from
    pub source: AuthSource,
}

impl std::fmt::Debug for AuthHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHeader")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Token variables consulted for each platform, in order
const fn token_vars(platform: Platform) -> &'static [&'static str] {
    match platform {
        Platform::GitHub => &["GITHUB_TOKEN", "GH_TOKEN"],
        Platform::GitLab => &["GITLAB_TOKEN"],
        Platform::BitbucketCloud | Platform::BitbucketServer => &["BITBUCKET_TOKEN"],
    }
}

/// Resolve the header from an explicit value and an environment lookup
///
/// Order: explicit value, `IBB_AUTH_HEADER`, platform token variables as a
/// bearer token, then Bitbucket username plus app password as basic auth.
pub fn resolve_from_env<F>(platform: Platform, explicit: Option<&str>, lookup: F) -> Option<AuthHeader>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(value) = explicit.filter(|v| !v.trim().is_empty()) {
        return Some(AuthHeader {
            value: value.to_string(),
            source: AuthSource::Flag,
        });
    }

    if let Some(value) = non_empty(AUTH_HEADER_ENV) {
        debug!(var = AUTH_HEADER_ENV, "using auth header from environment");
        return Some(AuthHeader {
            value,
            source: AuthSource::EnvVar,
        });
    }

    for var in token_vars(platform) {
        if let Some(token) = non_empty(var) {
            debug!(var, "using token from environment");
            return Some(AuthHeader {
                value: format!("Bearer {}", token.trim()),
                source: AuthSource::EnvVar,
            });
        }
    }

    if matches!(platform, Platform::BitbucketCloud | Platform::BitbucketServer)
        && let (Some(user), Some(password)) =
            (non_empty("BITBUCKET_USERNAME"), non_empty("BITBUCKET_APP_PASSWORD"))
    {
        debug!("using Bitbucket app password from environment");
        return Some(AuthHeader {
            value: format!("Basic {}", STANDARD.encode(format!("{user}:{password}"))),
            source: AuthSource::EnvVar,
        });
    }

    None
}

/// Resolve the `Authorization` header for `platform`
///
/// Falls back to `gh auth token` for GitHub when nothing else is set.
///
/// # Errors
/// `Auth` when no credentials are available.
pub async fn resolve_auth_header(platform: Platform, explicit: Option<&str>) -> Result<AuthHeader> {
    if let Some(header) = resolve_from_env(platform, explicit, |name| std::env::var(name).ok()) {
        return Ok(header);
    }

    if platform == Platform::GitHub
        && let Some(token) = get_gh_token().await
    {
        debug!("using token from gh CLI");
        return Ok(AuthHeader {
            value: format!("Bearer {token}"),
            source: AuthSource::Cli,
        });
    }

    let hint = match platform {
        Platform::GitHub => "set GITHUB_TOKEN, run `gh auth login`, or pass --auth-header",
        Platform::GitLab => "set GITLAB_TOKEN or pass --auth-header",
        Platform::BitbucketCloud | Platform::BitbucketServer => {
            "set BITBUCKET_TOKEN, BITBUCKET_USERNAME and BITBUCKET_APP_PASSWORD, or pass --auth-header"
        }
    };
    Err(Error::Auth(format!("no {platform} credentials found; {hint}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_explicit_wins() {
        let header = resolve_from_env(
            Platform::GitHub,
            Some("token abc"),
            env(&[(AUTH_HEADER_ENV, "Bearer env"), ("GITHUB_TOKEN", "gh")]),
        )
        .unwrap();
        assert_eq!(header.value, "token abc");
        assert_eq!(header.source, AuthSource::Flag);
    }

    #[test]
    fn test_header_env_before_tokens() {
        let header = resolve_from_env(
            Platform::GitLab,
            None,
            env(&[(AUTH_HEADER_ENV, "Bearer env"), ("GITLAB_TOKEN", "gl")]),
        )
        .unwrap();
        assert_eq!(header.value, "Bearer env");
    }

    #[test]
    fn test_platform_tokens() {
        let gh = resolve_from_env(Platform::GitHub, None, env(&[("GH_TOKEN", "x1")])).unwrap();
        assert_eq!(gh.value, "Bearer x1");

        let gl = resolve_from_env(Platform::GitLab, None, env(&[("GITHUB_TOKEN", "nope")]));
        assert!(gl.is_none());
    }

    #[test]
    fn test_bitbucket_basic_auth() {
        let header = resolve_from_env(
            Platform::BitbucketCloud,
            None,
            env(&[("BITBUCKET_USERNAME", "user"), ("BITBUCKET_APP_PASSWORD", "pass")]),
        )
        .unwrap();
        assert_eq!(header.value, "Basic dXNlcjpwYXNz");
        assert_eq!(header.source, AuthSource::EnvVar);
    }

    #[test]
    fn test_blank_values_ignored() {
        let header = resolve_from_env(
            Platform::BitbucketServer,
            Some("  "),
            env(&[(AUTH_HEADER_ENV, ""), ("BITBUCKET_TOKEN", "t")]),
        )
        .unwrap();
        assert_eq!(header.value, "Bearer t");
    }

    #[test]
    fn test_debug_redacts_value() {
        let header = AuthHeader {
            value: "Bearer secret".to_string(),
            source: AuthSource::Flag,
        };
        assert!(!format!("{header:?}").contains("secret"));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(AuthSource::Flag.to_string(), "--auth-header");
        assert_eq!(AuthSource::EnvVar.to_string(), "environment");
        assert_eq!(AuthSource::Cli.to_string(), "gh CLI");
    }

    #[tokio::test]
    #[serial]
    #[allow(unsafe_code)]
    async fn test_reads_process_environment() {
        // SAFETY: serialized with every other test touching the environment
        unsafe { std::env::set_var(AUTH_HEADER_ENV, "Bearer from-env") };
        let header = resolve_auth_header(Platform::BitbucketCloud, None).await;
        unsafe { std::env::remove_var(AUTH_HEADER_ENV) };

        let header = header.unwrap();
        assert_eq!(header.value, "Bearer from-env");
        assert_eq!(header.source, AuthSource::EnvVar);
    }
}
