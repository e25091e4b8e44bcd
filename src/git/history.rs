//! Commit history reading

use crate::error::{Error, Result};
use crate::git::command::{check_ref, run_git_output};
use crate::types::CommitRecord;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static HASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-f]{7,64}$").expect("valid hash regex"));

/// List commits reachable from `to_ref` but not `from_ref`, newest first
///
/// An empty range is `Ok(vec![])`; any query failure is
/// [`Error::HistoryUnavailable`].
pub fn list_commits_between(
    workdir: &Path,
    from_ref: &str,
    to_ref: &str,
) -> Result<Vec<CommitRecord>> {
    let range = format!("{from_ref}..{to_ref}");
    let unavailable = |message: String| Error::HistoryUnavailable {
        range: range.clone(),
        message,
    };

    check_ref(from_ref).map_err(|e| unavailable(e.to_string()))?;
    check_ref(to_ref).map_err(|e| unavailable(e.to_string()))?;

    let output = run_git_output(workdir, &["rev-list", "--parents", &range])?;
    if !output.success {
        return Err(unavailable(output.stderr.trim().to_string()));
    }

    let commits = parse_rev_list(&output.stdout).map_err(unavailable)?;
    debug!(%range, count = commits.len(), "listed commits");
    Ok(commits)
}

/// Parse `git rev-list --parents` output
///
/// Each line is a commit hash followed by its parent hashes. Blank lines are
/// skipped; anything that isn't a hash is rejected.
pub fn parse_rev_list(output: &str) -> std::result::Result<Vec<CommitRecord>, String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut hashes = line.split_whitespace();
            let hash = hashes
                .next()
                .ok_or_else(|| format!("empty rev-list line: {line:?}"))?;
            let parents: Vec<String> = hashes.map(ToString::to_string).collect();

            if let Some(bad) = std::iter::once(hash)
                .chain(parents.iter().map(String::as_str))
                .find(|h| !HASH_RE.is_match(h))
            {
                return Err(format!("unexpected rev-list token {bad:?}"));
            }

            Ok(CommitRecord::new(hash, parents))
        })
        .collect()
}
