//! Materializing a tree into a directory
//!
//! A checkout writes every blob of a tree (or of a commit's root tree) below
//! an empty target directory. Nothing outside the target is touched: tree
//! entry names are validated before they are joined onto a path, and the
//! nesting depth is bounded.

pub mod tree_checkout;
