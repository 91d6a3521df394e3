//! The retained UI tree.
//!
//! A [`Node`] is a cheap-to-clone handle onto a shared tree node; clones
//! alias the same underlying node, and equality/hashing follow node identity
//! rather than structure. Nodes carry their own native listeners, and
//! [`Node::fire`] runs full two-phase propagation (capture down, bubble up)
//! over the current tree, which is the hook delegation builds on.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::TreeError;
use crate::event::Event;

/// Unique identifier for a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a native listener, returned by [`Node::add_listener`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ListenerId(pub usize);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Global counters for generating unique node and listener IDs.
static NEXT_NODE_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_LISTENER_ID: AtomicUsize = AtomicUsize::new(0);

fn next_node_id() -> NodeId {
    NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::SeqCst))
}

fn next_listener_id() -> ListenerId {
    ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::SeqCst))
}

/// Type alias for native listener callbacks.
pub type ListenerCallback = Rc<dyn Fn(&Event)>;

struct ListenerEntry {
    id: ListenerId,
    event_type: String,
    capture: bool,
    callback: ListenerCallback,
}

/// A handle onto a node in the UI tree.
#[derive(Clone)]
pub struct Node {
    inner: Rc<NodeInner>,
}

struct NodeInner {
    id: NodeId,
    tag: String,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<Node>>,
    listeners: RefCell<Vec<ListenerEntry>>,
}

impl Node {
    /// Create a new detached node with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                id: next_node_id(),
                tag: tag.into(),
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// This node's identity.
    pub fn id(&self) -> NodeId {
        self.inner.id
    }

    /// The tag this node was created with.
    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// The current parent, if the node is attached.
    pub fn parent(&self) -> Option<Node> {
        self.inner.parent.borrow().upgrade().map(|inner| Node { inner })
    }

    /// Handles onto the current children, in order.
    pub fn children(&self) -> Vec<Node> {
        self.inner.children.borrow().clone()
    }

    /// Whether `other` is this node or one of its descendants.
    pub fn contains(&self, other: &Node) -> bool {
        let mut cursor = Some(other.clone());
        while let Some(node) = cursor {
            if node == *self {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// Append `child` as the last child of this node.
    ///
    /// A child attached elsewhere is moved here. Fails with
    /// [`TreeError::WouldCycle`] if `child` is this node or an ancestor of it.
    pub fn append_child(&self, child: &Node) -> Result<(), TreeError> {
        if child.contains(self) {
            return Err(TreeError::WouldCycle);
        }
        child.detach();
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        self.inner.children.borrow_mut().push(child.clone());
        Ok(())
    }

    /// Remove `child` from this node's children.
    pub fn remove_child(&self, child: &Node) -> Result<(), TreeError> {
        let mut children = self.inner.children.borrow_mut();
        let index = children
            .iter()
            .position(|c| c == child)
            .ok_or(TreeError::NotAChild)?;
        children.remove(index);
        *child.inner.parent.borrow_mut() = Weak::new();
        Ok(())
    }

    /// Detach this node from its parent, if any.
    fn detach(&self) {
        if let Some(parent) = self.parent() {
            // The parent link exists, so removal cannot fail.
            let _ = parent.remove_child(self);
        }
    }

    /// Attach a native listener for `event_type` on this node.
    ///
    /// `capture` selects the propagation phase the listener runs in. Returns
    /// an id that [`Node::remove_listener`] accepts.
    pub fn add_listener(
        &self,
        event_type: impl Into<String>,
        capture: bool,
        callback: impl Fn(&Event) + 'static,
    ) -> ListenerId {
        let id = next_listener_id();
        self.inner.listeners.borrow_mut().push(ListenerEntry {
            id,
            event_type: event_type.into(),
            capture,
            callback: Rc::new(callback),
        });
        id
    }

    /// Remove a native listener by id.
    ///
    /// Returns `true` if a listener was removed. Removing an unknown id is a
    /// no-op.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Number of native listeners currently attached to this node.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Fire an event of the given type targeting this node.
    ///
    /// Propagation follows the host-runtime contract: capture-phase listeners
    /// run from the topmost ancestor down to the target, then bubble-phase
    /// listeners run from the target back up. [`Event::stop_propagation`]
    /// halts movement to the next node. Returns the event so callers can
    /// inspect [`Event::default_prevented`].
    pub fn fire(&self, event_type: impl Into<String>) -> Event {
        let event = Event::new(event_type, self.clone());

        // Path from the target up to the root of its tree.
        let mut path = Vec::new();
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            cursor = node.parent();
            path.push(node);
        }

        for node in path.iter().rev() {
            if event.propagation_stopped() {
                return event;
            }
            node.run_listeners(&event, true);
        }
        for node in &path {
            if event.propagation_stopped() {
                return event;
            }
            node.run_listeners(&event, false);
        }
        event
    }

    /// Run this node's listeners for the event's type in the given phase.
    fn run_listeners(&self, event: &Event, capture: bool) {
        // Snapshot matching callbacks first: a listener may add or remove
        // listeners on this very node while it runs.
        let matching: Vec<ListenerCallback> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.capture == capture && entry.event_type == event.event_type())
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        for callback in matching {
            callback(event);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(<{}> #{})", self.inner.tag, self.inner.id)
    }
}
