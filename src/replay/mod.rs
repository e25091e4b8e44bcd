//! Resolution cache warming by replaying historical merges
//!
//! Two-phase pattern matching merge/:
//! 1. Plan - isolate the merge chain at the tip of a range (pure, testable)
//! 2. Execute - replay each merge to train the cache (effectful)

mod chain;
mod execute;

pub use chain::find_merge_chain;
pub use execute::{ReplayFailure, ReplayOptions, ReplayReport, replay_merge, warm_resolution_cache};
