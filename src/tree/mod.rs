//! Hierarchical path-tree over flat, delimiter-separated names.
//!
//! This module provides the tree core: each path segment becomes a node,
//! shared prefixes collapse into shared ancestor nodes, and the structure
//! can be updated incrementally (insert, delete, re-sort) without being
//! rebuilt from scratch.

mod node;
mod path_tree;

pub use node::{Node, NodeId};
pub use path_tree::PathTree;
