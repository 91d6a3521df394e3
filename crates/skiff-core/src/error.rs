//! Error types for tree manipulation.

use thiserror::Error;

/// Errors produced by structural operations on the UI tree.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// Appending the node would make it its own ancestor.
    #[error("appending this node would create a cycle in the tree")]
    WouldCycle,

    /// The node passed to `remove_child` is not a child of the receiver.
    #[error("node is not a child of this parent")]
    NotAChild,
}
