//! Progress reporting for long-running operations
//!
//! The replay and topic-merge engines notify a [`ProgressCallback`] as they go.
//! Every method has a no-op default so reporters only implement what they show.

use crate::error::Error;
use crate::merge::UnresolvedMerge;
use crate::types::{CommitRecord, ResolutionOutcome};

/// Receiver for progress events
pub trait ProgressCallback: Send + Sync {
    /// Free-form status message
    fn on_message(&self, _message: &str) {}

    /// About to replay a historical merge
    fn on_replay_start(&self, _commit: &CommitRecord) {}

    /// Resolution cache trained on a historical merge
    fn on_replay_trained(&self, _commit: &CommitRecord) {}

    /// Replaying a historical merge failed; the run continues
    fn on_replay_failed(&self, _commit: &CommitRecord, _error: &Error) {}

    /// About to merge a topic branch
    fn on_topic_start(&self, _branch: &str) {}

    /// A topic merge finished successfully
    fn on_topic_merged(&self, _branch: &str, _outcome: ResolutionOutcome) {}

    /// A topic merge left conflicts; the chain halts after this
    fn on_topic_unresolved(&self, _conflict: &UnresolvedMerge) {}
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {}
