//! Skiff - a lightweight event-delegation library for retained UI trees.
//!
//! Skiff keeps a registry mapping event types to per-node handlers and
//! installs a single capture-phase listener per event type on one root node,
//! instead of attaching a listener to every interactive element.
//!
//! # Quick Start
//!
//! ```ignore
//! use skiff::prelude::*;
//!
//! fn main() {
//!     let root = Node::new("div");
//!     let nav = Node::new("ul");
//!     let home = Node::new("li");
//!     root.append_child(&nav).unwrap();
//!     nav.append_child(&home).unwrap();
//!
//!     let delegator = EventDelegator::new();
//!     delegator.bind_root(&root);
//!     delegator
//!         .register("click", &nav, |event| {
//!             println!("nav item clicked: {:?}", event.target());
//!         })
//!         .unwrap();
//!
//!     // One listener on the root handles clicks on every nav item.
//!     home.fire("click");
//! }
//! ```
//!
//! # Matching Policies
//!
//! | Policy | Behavior |
//! |--------|----------|
//! | [`MatchPolicy::ClosestAncestor`] | Walk from the target up to the root, nearest registered node wins (default) |
//! | [`MatchPolicy::ExactTarget`] | Only a handler registered for the exact target fires |
//!
//! Either way, at most one handler runs per dispatched event.

pub mod delegate;

pub mod prelude {
    //! Common imports for skiff applications.
    pub use crate::delegate::{DelegateError, EventDelegator, MatchPolicy};
    pub use skiff_core::{Event, ListenerId, Node, NodeId, TreeError};
}

// Re-export core types at crate root
pub use delegate::{DelegateError, EventDelegator, Handler, MatchPolicy};
pub use skiff_core::{Event, ListenerId, Node, NodeId, TreeError};

pub use skiff_core as core;
