//! Line diffs between the index and the worktree
//!
//! - `diff_algorithm`: Myers' diff producing an edit script
//! - `hunk`: grouping of edits into hunks with surrounding context
//! - `unified`: unified-format rendering of two line sequences
//! - `workspace_diff`: the diff of every changed file against its staged blob

pub mod diff_algorithm;
pub mod hunk;
pub mod unified;
pub mod workspace_diff;
