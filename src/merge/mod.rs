//! Sequential topic merge engine
//!
//! Two-phase pattern matching replay/:
//! 1. Plan - create `TopicMergePlan` (pure, testable)
//! 2. Execute - perform merges (effectful)

mod execute;
mod plan;

pub use execute::{
    TopicMergeOptions, TopicMergeResult, UnresolvedMerge, merge_topic, merge_topics,
};
pub use plan::{TopicMergePlan, TopicStep, create_topic_plan};
