//! Merge chain detection - pure functions over commit history
//!
//! No I/O happens here; the history is read beforehand by the caller.

use crate::types::{CommitRecord, MergeChain};

/// Isolate the merge chain from a newest-first commit list
///
/// Non-merge commits before the first merge are skipped. Once a merge has
/// been seen, the first non-merge ends the chain and nothing older is looked at.
#[must_use]
pub fn find_merge_chain(commits: &[CommitRecord]) -> MergeChain {
    let mut chain = Vec::new();
    let mut saw_merge = false;

    for commit in commits {
        if commit.is_merge() {
            saw_merge = true;
            chain.push(commit.clone());
        } else if saw_merge {
            break;
        }
    }

    MergeChain::new(chain)
}
