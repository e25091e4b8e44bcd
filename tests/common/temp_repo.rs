//! Throwaway git repositories for end-to-end tests

#![allow(dead_code)]

use integration_branch_builder::git::run_git_output;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A real git repository in a temporary directory
///
/// Starts on `main` with one commit holding `file.txt` = `base`.
pub struct TempGitRepo {
    dir: TempDir,
}

impl TempGitRepo {
    /// Create the repository with a local identity and an initial commit
    pub fn new() -> Self {
        let repo = Self {
            dir: TempDir::new().unwrap(),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.email", "test@test.com"]);
        repo.git(&["config", "user.name", "Test"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.git(&["config", "rerere.enabled", "false"]);
        repo.write("file.txt", "base\n");
        repo.commit_all("Initial commit");
        repo
    }

    /// Repository root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Run git and return trimmed stdout, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = run_git_output(self.path(), args).unwrap();
        assert!(
            output.success,
            "git {} failed: {}",
            args.join(" "),
            output.stderr
        );
        output.stdout.trim().to_string()
    }

    /// Run git and report only whether it succeeded
    pub fn try_git(&self, args: &[&str]) -> bool {
        run_git_output(self.path(), args).unwrap().success
    }

    /// Write a file relative to the repository root
    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.path().join(file), content).unwrap();
    }

    /// Read a file relative to the repository root
    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path().join(file)).unwrap()
    }

    /// Stage everything and commit
    pub fn commit_all(&self, message: &str) {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
    }

    /// Create `branch` from `start`, set `file.txt`, commit, and return to `main`
    pub fn topic(&self, branch: &str, start: &str, content: &str) {
        self.git(&["checkout", "-q", "-b", branch, start]);
        self.write("file.txt", content);
        self.commit_all(&format!("{branch} changes file.txt"));
        self.git(&["checkout", "-q", "main"]);
    }

    /// Create `branch` from `start` with an extra file, and return to `main`
    pub fn topic_with_file(&self, branch: &str, start: &str, file: &str, content: &str) {
        self.git(&["checkout", "-q", "-b", branch, start]);
        self.write(file, content);
        self.commit_all(&format!("{branch} adds {file}"));
        self.git(&["checkout", "-q", "main"]);
    }

    /// Commit hash of a revision
    pub fn rev(&self, rev: &str) -> String {
        self.git(&["rev-parse", rev])
    }

    /// Parent hashes of a revision
    pub fn parents(&self, rev: &str) -> Vec<String> {
        let line = self.git(&["rev-list", "--parents", "-n", "1", rev]);
        line.split_whitespace().skip(1).map(String::from).collect()
    }

    /// Current branch name
    pub fn branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// A merge is in progress
    pub fn merge_in_progress(&self) -> bool {
        self.try_git(&["rev-parse", "-q", "--verify", "MERGE_HEAD"])
    }

    /// Number of recorded resolutions with a postimage
    pub fn recorded_resolutions(&self) -> usize {
        let rr_cache = self.path().join(".git").join("rr-cache");
        let Ok(entries) = fs::read_dir(rr_cache) else {
            return 0;
        };
        entries
            .filter_map(Result::ok)
            .filter(|e| e.path().join("postimage").exists())
            .count()
    }

    /// Build `branch` from main by merging `a` cleanly, then `b` with a
    /// conflict resolved by hand to `resolution`
    pub fn resolved_integration(&self, branch: &str, a: &str, b: &str, resolution: &str) {
        self.git(&["checkout", "-q", "-b", branch, "main"]);
        self.git(&["merge", "-q", "--no-ff", "--no-edit", a]);
        assert!(!self.try_git(&["merge", "-q", "--no-ff", "--no-edit", b]));
        self.write("file.txt", resolution);
        self.git(&["add", "file.txt"]);
        self.git(&["commit", "-q", "--no-edit"]);
        self.git(&["checkout", "-q", "main"]);
    }
}
