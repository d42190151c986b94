//! Working tree status inspection
//!
//! Compares the regular files of the worktree against the index.
//!
//! ## Components
//!
//! - `inspector`: per-path comparison of a file against its index entry
//! - `status_info`: the aggregated changed/new/deleted sets

pub mod inspector;
pub mod status_info;
