//! Core types for skiff.
//!
//! This crate provides the retained UI tree that delegation anchors to:
//! [`Node`] handles with parent/child links and per-node native listeners,
//! the [`Event`] value that propagates through the tree, and [`TreeError`]
//! for structural mistakes.

pub mod error;
pub mod event;
pub mod node;

pub use error::TreeError;
pub use event::Event;
pub use node::{ListenerId, Node, NodeId};
