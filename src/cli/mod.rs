//! Command implementations for the `ibb` binary

mod build;
mod config;
mod context;
mod discover;
mod merge;
pub mod style;
mod warm;

pub use build::{BuildCommandOptions, run_build};
pub use config::run_config;
pub use context::DiscoveryArgs;
pub use discover::run_discover;
pub use merge::{MergeCommandOptions, run_merge};
pub use warm::{WarmCommandOptions, run_warm};

use anstream::println;
use integration_branch_builder::error::Error;
use integration_branch_builder::merge::UnresolvedMerge;
use integration_branch_builder::progress::ProgressCallback;
use integration_branch_builder::types::{CommitRecord, ResolutionOutcome};
use style::{Stylize, arrow, check, cross};

/// CLI progress reporter
///
/// Prints one line per event. Conflict diffs are shown at `-v` and above.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliProgress {
    verbose: u8,
}

impl CliProgress {
    /// Create a reporter for the given verbosity
    pub const fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    /// Whether conflict diffs should be captured and shown
    pub const fn show_diffs(self) -> bool {
        self.verbose > 0
    }
}

impl ProgressCallback for CliProgress {
    fn on_message(&self, message: &str) {
        println!("{}", message.muted());
    }

    fn on_replay_start(&self, commit: &CommitRecord) {
        let incoming: Vec<&str> = commit
            .incoming_parents()
            .iter()
            .map(|p| p.get(..10).unwrap_or(p))
            .collect();
        println!(
            "{} Replaying {} {}",
            arrow(),
            commit.short_hash().accent(),
            format!("(merging {})", incoming.join(", ")).muted()
        );
    }

    fn on_replay_trained(&self, commit: &CommitRecord) {
        println!("  {} Recorded {}", check(), commit.short_hash().accent());
    }

    fn on_replay_failed(&self, commit: &CommitRecord, error: &Error) {
        println!(
            "  {} {}",
            cross(),
            format!("Skipped {}: {error}", commit.short_hash()).warn()
        );
    }

    fn on_topic_start(&self, branch: &str) {
        println!("{} Merging {}", arrow(), branch.emphasis());
    }

    fn on_topic_merged(&self, branch: &str, outcome: ResolutionOutcome) {
        let detail = match outcome {
            ResolutionOutcome::CacheResolved => outcome.to_string().accent(),
            _ => outcome.to_string().muted(),
        };
        println!("  {} Merged {} ({detail})", check(), branch.emphasis());
    }

    fn on_topic_unresolved(&self, conflict: &UnresolvedMerge) {
        println!(
            "  {} {}",
            cross(),
            format!(
                "Unresolved conflicts merging {} in {} file(s):",
                conflict.branch,
                conflict.files.len()
            )
            .error()
        );
        for file in &conflict.files {
            println!("      {file}");
        }
        if self.show_diffs()
            && let Some(diff) = &conflict.diff
        {
            println!();
            println!("{diff}");
        }
    }
}
