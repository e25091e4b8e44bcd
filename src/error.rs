//! Error types for integration-branch-builder

use crate::types::Platform;
use thiserror::Error;

/// Errors raised by history reading, replay, topic merging and discovery
#[derive(Debug, Error)]
pub enum Error {
    /// History query failed or a reference could not be resolved
    #[error("history unavailable for {range}: {message}")]
    HistoryUnavailable {
        /// The `from..to` range that was queried
        range: String,
        /// What went wrong
        message: String,
    },

    /// The working directory is not inside a git checkout
    #[error("not a git repository: {0}")]
    NotARepository(String),

    /// A single historical merge could not be replayed
    #[error("replay of merge {commit} failed: {message}")]
    ReplayFailed {
        /// Merge commit being replayed
        commit: String,
        /// What went wrong
        message: String,
    },

    /// A topic merge left conflicts that need manual resolution
    #[error("unresolved conflicts merging {branch} ({} file(s))", files.len())]
    Unresolved {
        /// Topic branch whose merge conflicted
        branch: String,
        /// Files still conflicted in the working tree
        files: Vec<String>,
    },

    /// Pull request API returned a non-success status
    #[error("{platform} pull requests API returned non-success response: {status}")]
    DiscoveryFailed {
        /// Platform that was queried
        platform: Platform,
        /// HTTP status code
        status: u16,
    },

    /// An external command exited with a non-zero status
    #[error("{message}")]
    Command {
        /// Caller-supplied description
        message: String,
        /// The command line that was run
        command: String,
        /// Captured stderr
        stderr: String,
    },

    /// Tracked files have uncommitted changes that a run would overwrite
    #[error("working tree has uncommitted changes in {} file(s): {}; commit or stash them first", files.len(), files.join(", "))]
    DirtyWorkingTree {
        /// Modified or staged tracked files
        files: Vec<String>,
    },

    /// A topic merge failed without entering a conflicted state
    #[error("merge of {branch} failed: {message}")]
    MergeFailed {
        /// Topic branch being merged
        branch: String,
        /// What went wrong
        message: String,
    },

    /// A reference that git would parse as an option
    #[error("invalid ref: {0}")]
    InvalidRef(String),

    /// Config file could not be read or written
    #[error("config error: {0}")]
    Config(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Remote URL did not match any supported platform
    #[error("no supported remote found; pass --platform, --owner and --repo")]
    NoSupportedRemotes,

    /// Pull request API request or response handling failed
    #[error("{platform} API error: {message}")]
    PlatformApi {
        /// Platform that was queried
        platform: Platform,
        /// What went wrong
        message: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
