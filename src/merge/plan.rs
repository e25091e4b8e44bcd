//! Topic merge planning - pure functions for creating merge plans
//!
//! This module contains the pure, testable logic for deciding which topic
//! branches get merged. No I/O happens here - all data is passed in, making it
//! easy to unit test.

use crate::types::TopicMergeRequest;
use std::collections::HashSet;

/// A single step in the topic merge plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicStep {
    /// Merge this topic branch onto the target
    Merge {
        /// Topic branch name
        branch: String,
    },
    /// Leave this topic branch out
    Skip {
        /// Topic branch name
        branch: String,
        /// Why it is left out
        reason: String,
    },
}

impl TopicStep {
    /// Get the branch name for this step
    pub fn branch_name(&self) -> &str {
        match self {
            Self::Merge { branch } | Self::Skip { branch, .. } => branch,
        }
    }
}

impl std::fmt::Display for TopicStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merge { branch } => write!(f, "merge {branch}"),
            Self::Skip { branch, reason } => write!(f, "skip {branch}: {reason}"),
        }
    }
}

/// Topic merge plan - the functional core output
///
/// Created by `create_topic_plan()` (pure) and executed by `merge_topics()`
/// (effectful).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMergePlan {
    /// Branch receiving the merges
    pub target_branch: String,
    /// Ordered steps to perform (or skip)
    pub steps: Vec<TopicStep>,
}

impl TopicMergePlan {
    /// Check if the plan has any merge steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.steps.iter().any(|s| matches!(s, TopicStep::Merge { .. }))
    }

    /// Count topic branches that will be merged
    #[must_use]
    pub fn merge_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, TopicStep::Merge { .. }))
            .count()
    }

    /// Branches to merge, in order
    pub fn branches(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(|s| match s {
            TopicStep::Merge { branch } => Some(branch.as_str()),
            TopicStep::Skip { .. } => None,
        })
    }
}

/// Create a topic merge plan (PURE - no I/O, easily testable)
///
/// Keeps the caller's ordering. A branch listed twice is merged the first time
/// and skipped after that; the target branch itself is never merged into itself.
#[must_use]
pub fn create_topic_plan(request: &TopicMergeRequest) -> TopicMergePlan {
    let mut seen = HashSet::new();
    let mut steps = Vec::with_capacity(request.topic_branches.len());

    for branch in &request.topic_branches {
        if *branch == request.target_branch {
            steps.push(TopicStep::Skip {
                branch: branch.clone(),
                reason: "is the target branch".to_string(),
            });
        } else if !seen.insert(branch.as_str()) {
            steps.push(TopicStep::Skip {
                branch: branch.clone(),
                reason: "already listed".to_string(),
            });
        } else {
            steps.push(TopicStep::Merge {
                branch: branch.clone(),
            });
        }
    }

    TopicMergePlan {
        target_branch: request.target_branch.clone(),
        steps,
    }
}
