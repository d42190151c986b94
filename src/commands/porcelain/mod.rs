//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `checkout`: Write a commit's tree into an empty directory
//! - `status`: Show how the worktree differs from the index
//! - `diff`: Show line changes between the index and the worktree
//! - `tag`: List or create tags
//! - `log`: Print the commit graph for Graphviz

pub mod checkout;
pub mod diff;
pub mod init;
pub mod log;
pub mod status;
pub mod tag;
