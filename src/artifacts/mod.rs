//! Data structures and algorithms over repository data
//!
//! - `checkout`: Writing a tree into a directory
//! - `config`: `.git/config` and the user identity
//! - `core`: Terminal output helpers (pager)
//! - `diff`: Myers' diff and unified rendering
//! - `index`: Index file format
//! - `log`: Commit graph traversal
//! - `objects`: Object kinds and their codecs
//! - `refs`: Reference names
//! - `revision`: Turning user-supplied names into object ids
//! - `status`: Worktree status against the index

pub mod checkout;
pub mod config;
pub mod core;
pub mod diff;
pub mod index;
pub mod log;
pub mod objects;
pub mod refs;
pub mod revision;
pub mod status;
