//! A small git-compatible repository toolkit
//!
//! - `areas`: the object database, refs, index and worktree of a repository
//! - `artifacts`: object codecs, index format, revisions, diff, status, checkout
//! - `commands`: command implementations writing to the repository writer
//! - `errors`: the error type shared by the library

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
