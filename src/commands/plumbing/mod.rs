//! Plumbing commands (low-level operations)
//!
//! Plumbing commands give direct access to the object database, the refs and
//! the index. They are mostly useful for scripting.
//!
//! ## Commands
//!
//! - `cat-file`: Print an object's payload, kind, size or rendering
//! - `hash-object`: Compute an object id and optionally store the object
//! - `ls-files`: List the index
//! - `ls-tree`: List the contents of a tree object
//! - `rev-parse`: Resolve a name to an object id
//! - `show-ref`: List references

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod ls_tree;
pub mod rev_parse;
pub mod show_ref;
