//! Commit history as a graph
//!
//! - `commit_graph`: depth-first walk of the (commit → parent) edges
//!   reachable from a commit, and their Graphviz rendering

pub mod commit_graph;
