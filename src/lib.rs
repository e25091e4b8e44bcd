//! integration-branch-builder - rebuild integration branches from topic branches
//!
//! Two engines sit at the core:
//!
//! - [`replay`] walks the merge chain at the tip of a commit range and replays
//!   each merge so git's rerere cache learns how its conflicts were resolved.
//! - [`merge`] merges topic branches onto an integration branch in order,
//!   classifying each merge as clean, resolved from the cache, or unresolved,
//!   and halting at the first conflict that needs a human.
//!
//! [`platform`] discovers topic branches from open pull requests and
//! [`build`] feeds them into the merge engine.

pub mod auth;
pub mod build;
pub mod config;
pub mod error;
pub mod git;
pub mod merge;
pub mod platform;
pub mod progress;
pub mod replay;
pub mod types;

pub use error::{Error, Result};
