//! Core repository components
//!
//! - `database`: Object database for storing blobs, trees, commits and tags
//! - `index`: Staging area (index/cache), read side
//! - `refs`: Reference resolution and listing (HEAD, branches, tags)
//! - `repository`: Opening, finding and initializing a repository
//! - `workspace`: Working directory file system access

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
