//! Command implementations
//!
//! Every command is a method on [`Repository`](crate::areas::repository::Repository)
//! writing to the repository's output writer. They come in two categories:
//!
//! - `plumbing`: Low-level access to objects, refs and the index
//! - `porcelain`: User-facing workflows built on top of them

pub mod plumbing;
pub mod porcelain;
