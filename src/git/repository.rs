//! `Repository` backed by the git CLI

use crate::error::{Error, Result};
use crate::git::Repository;
use crate::git::command::{check_ref, run_git, run_git_output};
use crate::git::history;
use crate::types::{CommitRecord, MergeStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Recursive strategy with the patience diff, shared by replay and topic merges
const MERGE_STRATEGY: [&str; 4] = ["-s", "recursive", "-X", "patience"];

/// Conflict markers keep the common ancestor text
const CONFLICT_STYLE: &str = "merge.conflictStyle=diff3";

/// Lines of context around each hunk in conflict diagnostics
const DIFF_CONTEXT: &str = "--unified=10";

/// Directory inside the git common dir holding recorded resolutions
const RR_CACHE_DIR: &str = "rr-cache";

/// A git checkout driven through the `git` binary
#[derive(Debug, Clone)]
pub struct GitRepository {
    workdir: PathBuf,
}

impl GitRepository {
    /// Open a checkout rooted at (or inside) `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Directory commands run in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git(&self, args: &[&str], error_msg: &str) -> Result<Vec<String>> {
        run_git(&self.workdir, args, error_msg)
    }

    fn merge_in_progress(&self) -> Result<bool> {
        let output = run_git_output(&self.workdir, &["rev-parse", "-q", "--verify", "MERGE_HEAD"])?;
        Ok(output.success)
    }

    /// Run a merge and classify how it stopped
    fn merge(&self, config: &[&str], options: &[&str], refs: &[&str]) -> Result<MergeStatus> {
        let mut args: Vec<&str> = Vec::new();
        for setting in config {
            args.push("-c");
            args.push(*setting);
        }
        args.push("merge");
        args.extend_from_slice(options);
        args.extend_from_slice(&MERGE_STRATEGY);
        args.extend_from_slice(refs);

        let output = run_git_output(&self.workdir, &args)?;
        if output.success {
            return Ok(MergeStatus::Completed);
        }
        if self.merge_in_progress()? {
            debug!(?refs, "merge stopped with conflicts");
            return Ok(MergeStatus::Conflicted);
        }
        let stderr = output.stderr.trim();
        Ok(MergeStatus::Failed(if stderr.is_empty() {
            format!("git merge exited unsuccessfully for {}", refs.join(" "))
        } else {
            stderr.to_string()
        }))
    }

    fn rr_cache_dir(&self) -> Result<PathBuf> {
        let lines = self.git(
            &["rev-parse", "--git-common-dir"],
            "Could not locate git directory.",
        )?;
        let common_dir = lines
            .first()
            .map(PathBuf::from)
            .ok_or_else(|| Error::Internal("git rev-parse printed nothing".to_string()))?;
        let common_dir = if common_dir.is_absolute() {
            common_dir
        } else {
            self.workdir.join(common_dir)
        };
        Ok(common_dir.join(RR_CACHE_DIR))
    }
}

impl Repository for GitRepository {
    fn ensure_repository(&self) -> Result<()> {
        let output = run_git_output(&self.workdir, &["rev-parse", "--is-inside-work-tree"]);
        match output {
            Ok(out) if out.success && out.stdout.trim() == "true" => Ok(()),
            _ => Err(Error::NotARepository(self.workdir.display().to_string())),
        }
    }

    fn list_commits_between(&self, from_ref: &str, to_ref: &str) -> Result<Vec<CommitRecord>> {
        history::list_commits_between(&self.workdir, from_ref, to_ref)
    }

    fn uncommitted_files(&self) -> Result<Vec<String>> {
        let lines = self.git(
            &["status", "--porcelain", "--untracked-files=no"],
            "Unable to read working tree status.",
        )?;
        Ok(lines
            .iter()
            .filter_map(|line| line.get(3..))
            .map(|path| path.rsplit(" -> ").next().unwrap_or(path).to_string())
            .collect())
    }

    fn current_head(&self) -> Result<String> {
        let branch = run_git_output(&self.workdir, &["symbolic-ref", "-q", "--short", "HEAD"])?;
        if branch.success {
            return Ok(branch.stdout.trim().to_string());
        }
        let lines = self.git(&["rev-parse", "HEAD"], "Could not resolve HEAD.")?;
        lines
            .into_iter()
            .next()
            .ok_or_else(|| Error::Internal("git rev-parse HEAD printed nothing".to_string()))
    }

    fn checkout_branch(&self, branch: &str) -> Result<()> {
        let branch = check_ref(branch)?;
        self.git(
            &["checkout", "--quiet", branch],
            &format!("Could not check out {branch}."),
        )?;
        Ok(())
    }

    fn checkout_detached(&self, commit: &str) -> Result<()> {
        let commit = check_ref(commit)?;
        self.git(
            &["checkout", "--quiet", "--detach", commit],
            "Could not checkout merge origin.",
        )?;
        Ok(())
    }

    fn create_branch(&self, branch: &str, start_point: &str) -> Result<()> {
        let branch = check_ref(branch)?;
        let start_point = check_ref(start_point)?;
        self.git(
            &["checkout", "--quiet", "-B", branch, start_point],
            &format!("Could not create {branch} from {start_point}."),
        )?;
        info!(branch, start_point, "created branch");
        Ok(())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        let remote = check_ref(remote)?;
        self.git(
            &["fetch", "--quiet", remote],
            &format!("Could not fetch from {remote}."),
        )?;
        Ok(())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let remote = check_ref(remote)?;
        let lines = self.git(
            &["remote", "get-url", remote],
            &format!("Could not read URL of remote {remote}."),
        )?;
        lines
            .into_iter()
            .next()
            .ok_or_else(|| Error::Internal(format!("remote {remote} has no URL")))
    }

    fn merge_for_replay(&self, incoming: &[String]) -> Result<MergeStatus> {
        let refs = incoming
            .iter()
            .map(|r| check_ref(r))
            .collect::<Result<Vec<&str>>>()?;
        self.merge(
            &[CONFLICT_STYLE, "rerere.enabled=true"],
            &["--quiet", "--no-commit", "--no-ff"],
            &refs,
        )
    }

    fn record_resolution(&self) -> Result<()> {
        self.git(
            &["-c", "rerere.enabled=true", "rerere"],
            "Unable to store current rerere state.",
        )?;
        Ok(())
    }

    fn align_to_historical_result(&self, commit: &str) -> Result<()> {
        let commit = check_ref(commit)?;
        self.git(
            &["checkout", "--quiet", commit, "--", "."],
            "Unable to check out merge resolution.",
        )?;
        Ok(())
    }

    fn reset_working_tree(&self) -> Result<()> {
        self.git(&["reset", "--quiet", "--hard"], "Unable to reset branch state.")?;
        Ok(())
    }

    fn merge_topic(&self, branch: &str) -> Result<MergeStatus> {
        let branch = check_ref(branch)?;
        self.merge(
            &[CONFLICT_STYLE, "rerere.enabled=true", "rerere.autoUpdate=true"],
            &["--no-ff", "--no-edit"],
            &[branch],
        )
    }

    fn unstaged_files(&self) -> Result<Vec<String>> {
        let mut files = self.git(
            &["diff", "--name-only"],
            "Unable to list unstaged files.",
        )?;
        files.dedup();
        Ok(files)
    }

    fn conflict_diff(&self) -> Result<String> {
        let lines = self.git(&["diff", DIFF_CONTEXT], "Unable to diff conflicts.")?;
        Ok(lines.join("\n"))
    }

    fn commit_merge(&self) -> Result<()> {
        self.git(
            &["commit", "--quiet", "--no-edit"],
            "Unable to commit resolved merge.",
        )?;
        Ok(())
    }

    fn enable_resolution_cache(&self) -> Result<()> {
        let dir = self.rr_cache_dir()?;
        fs::create_dir_all(&dir).map_err(|e| Error::Command {
            message: "Could not enable git rerere.".to_string(),
            command: format!("mkdir -p {}", dir.display()),
            stderr: e.to_string(),
        })?;
        Ok(())
    }

    fn clear_resolution_cache(&self) -> Result<()> {
        let dir = self.rr_cache_dir()?;
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| Error::Command {
                message: "Could not clear git rerere cache.".to_string(),
                command: format!("rm -rf {}", dir.display()),
                stderr: e.to_string(),
            })?;
            info!(path = %dir.display(), "cleared resolution cache");
        }
        Ok(())
    }
}
