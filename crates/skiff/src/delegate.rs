//! Event delegation over a retained UI tree.
//!
//! Instead of attaching a native listener to every interactive node, an
//! [`EventDelegator`] keeps a registry mapping event types to per-node
//! handlers and installs exactly one capture-phase listener per event type
//! on a single root node. Events fired anywhere under the root are routed
//! back through the registry to the right handler.
//!
//! The delegator is an ordinary value, not module-level state: applications
//! wire one shared instance explicitly, and tests create as many independent
//! instances as they like.
//!
//! # Example
//!
//! ```ignore
//! use skiff::prelude::*;
//!
//! let root = Node::new("div");
//! let button = Node::new("button");
//! root.append_child(&button)?;
//!
//! let delegator = EventDelegator::new();
//! delegator.bind_root(&root);
//! delegator.register("click", &button, |event| {
//!     println!("clicked {:?}", event.target());
//! })?;
//!
//! button.fire("click"); // handler runs via the root's capture listener
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use skiff_core::{Event, ListenerId, Node};
use thiserror::Error;

/// Type alias for delegated handler callbacks.
pub type Handler = Rc<dyn Fn(&Event)>;

/// Errors produced by delegation registration.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DelegateError {
    /// The event type passed to `register` was empty.
    #[error("event type must be a non-empty string")]
    EmptyEventType,
}

/// How an incoming event's target is matched against registered nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Walk from the event target up to the bound root and invoke the
    /// handler of the nearest registered node on that path. This is genuine
    /// delegation: a handler on a container fires for its descendants.
    #[default]
    ClosestAncestor,

    /// Invoke a handler only when the event target is exactly the node it
    /// was registered for. Events on descendants of registered nodes are
    /// dropped.
    ExactTarget,
}

struct HandlerEntry {
    node: Node,
    handler: Handler,
}

/// Per-delegator state behind the shared handle.
struct DelegatorInner {
    policy: MatchPolicy,
    root: Option<Node>,
    /// event type -> registered (node, handler) entries, in insertion order.
    registry: HashMap<String, Vec<HandlerEntry>>,
    /// event type -> the native listener this delegator holds on the root.
    attached: HashMap<String, ListenerId>,
}

/// Routes events fired under one root node to per-node handlers.
///
/// Cloning an `EventDelegator` yields another handle onto the same registry,
/// which is how an application shares one delegator across its pages.
///
/// Invariants maintained across all operations:
/// - a (type, node) pair maps to at most one handler; re-registering
///   replaces the previous handler silently,
/// - an event type holds a native listener on the root exactly while its
///   handler table is non-empty and a root is bound,
/// - emptied handler tables are removed eagerly, native listener included.
#[derive(Clone)]
pub struct EventDelegator {
    inner: Rc<RefCell<DelegatorInner>>,
}

impl EventDelegator {
    /// Create a delegator with the default [`MatchPolicy::ClosestAncestor`].
    pub fn new() -> Self {
        Self::with_policy(MatchPolicy::default())
    }

    /// Create a delegator with an explicit matching policy.
    pub fn with_policy(policy: MatchPolicy) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DelegatorInner {
                policy,
                root: None,
                registry: HashMap::new(),
                attached: HashMap::new(),
            })),
        }
    }

    /// The matching policy this delegator was created with.
    pub fn policy(&self) -> MatchPolicy {
        self.inner.borrow().policy
    }

    /// The currently bound root, if any.
    pub fn root(&self) -> Option<Node> {
        self.inner.borrow().root.clone()
    }

    /// Anchor delegation to `root`.
    ///
    /// Detaches this delegator's native listeners from the previous root (if
    /// any), then attaches one capture-phase listener per registered event
    /// type to the new root. Idempotent: re-binding the same root never
    /// accumulates duplicate listeners, and events fired under a previous
    /// root no longer reach any handler.
    pub fn bind_root(&self, root: &Node) {
        let event_types = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            if let Some(old_root) = inner.root.take() {
                for (_, listener_id) in inner.attached.drain() {
                    old_root.remove_listener(listener_id);
                }
            }
            inner.root = Some(root.clone());
            inner.registry.keys().cloned().collect::<Vec<_>>()
        };
        for event_type in &event_types {
            self.attach(event_type);
        }
        tracing::debug!(
            "Bound delegation root {:?} with {} live event type(s)",
            root,
            event_types.len()
        );
    }

    /// Register `handler` for events of `event_type` delegated to `node`.
    ///
    /// At most one handler exists per (type, node) pair; registering again
    /// replaces the previous handler and keeps the entry's position. When
    /// this is the first entry for the type and a root is bound, the native
    /// listener is attached immediately — no re-bind is needed.
    pub fn register(
        &self,
        event_type: impl Into<String>,
        node: &Node,
        handler: impl Fn(&Event) + 'static,
    ) -> Result<(), DelegateError> {
        let event_type = event_type.into();
        if event_type.is_empty() {
            return Err(DelegateError::EmptyEventType);
        }

        let needs_attach = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let table = inner.registry.entry(event_type.clone()).or_default();
            let first_for_type = table.is_empty();
            match table.iter_mut().find(|entry| entry.node == *node) {
                Some(entry) => entry.handler = Rc::new(handler),
                None => table.push(HandlerEntry {
                    node: node.clone(),
                    handler: Rc::new(handler),
                }),
            }
            first_for_type && inner.root.is_some()
        };
        if needs_attach {
            self.attach(&event_type);
        }
        tracing::trace!("Registered {} handler for {:?}", event_type, node);
        Ok(())
    }

    /// Remove the handler registered for (`node`, `event_type`).
    ///
    /// Idempotent: unknown types and nodes are no-ops. When the last entry
    /// for a type is removed, the type disappears from the registry and the
    /// native listener is detached from the root.
    pub fn unregister(&self, node: &Node, event_type: &str) {
        let mut detach: Option<(Node, ListenerId)> = None;
        {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            let Some(table) = inner.registry.get_mut(event_type) else {
                return;
            };
            let before = table.len();
            table.retain(|entry| entry.node != *node);
            if table.len() == before {
                return;
            }
            if table.is_empty() {
                inner.registry.remove(event_type);
                if let Some(listener_id) = inner.attached.remove(event_type) {
                    if let Some(root) = inner.root.clone() {
                        detach = Some((root, listener_id));
                    }
                }
            }
        }
        if let Some((root, listener_id)) = detach {
            root.remove_listener(listener_id);
            tracing::debug!("Detached {} listener from root, no handlers remain", event_type);
        }
        tracing::trace!("Unregistered {} handler for {:?}", event_type, node);
    }

    /// Whether any handler is registered for `event_type`.
    pub fn has_type(&self, event_type: &str) -> bool {
        self.inner.borrow().registry.contains_key(event_type)
    }

    /// Total number of registered handlers across all event types.
    pub fn handler_count(&self) -> usize {
        self.inner
            .borrow()
            .registry
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Remove every registered handler and detach all native listeners.
    ///
    /// The root binding itself is kept, so fresh registrations become live
    /// immediately.
    pub fn clear(&self) {
        let detach = {
            let mut guard = self.inner.borrow_mut();
            let inner = &mut *guard;
            inner.registry.clear();
            let root = inner.root.clone();
            inner
                .attached
                .drain()
                .filter_map(|(_, listener_id)| root.clone().map(|r| (r, listener_id)))
                .collect::<Vec<_>>()
        };
        for (root, listener_id) in detach {
            root.remove_listener(listener_id);
        }
        tracing::debug!("Cleared all delegated handlers");
    }

    /// Attach the capture-phase listener for `event_type` to the bound root.
    ///
    /// The listener holds only a weak reference back to the delegator, so the
    /// root node never keeps a dropped delegator alive.
    fn attach(&self, event_type: &str) {
        let Some(root) = self.inner.borrow().root.clone() else {
            return;
        };
        let weak: Weak<RefCell<DelegatorInner>> = Rc::downgrade(&self.inner);
        let listener_id = root.add_listener(event_type, true, move |event| {
            if let Some(inner) = weak.upgrade() {
                dispatch(&inner, event);
            }
        });
        self.inner
            .borrow_mut()
            .attached
            .insert(event_type.to_string(), listener_id);
        tracing::debug!("Attached {} capture listener to {:?}", event_type, root);
    }
}

impl Default for EventDelegator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventDelegator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EventDelegator")
            .field("policy", &inner.policy)
            .field("root", &inner.root)
            .field("event_types", &inner.registry.len())
            .finish()
    }
}

/// Route a native event to the matching registered handler, if any.
///
/// At most one handler runs per event. The registry borrow is released
/// before the handler is invoked, so handlers are free to re-enter
/// `register`/`unregister` on the same delegator.
fn dispatch(inner: &Rc<RefCell<DelegatorInner>>, event: &Event) {
    let handler = {
        let inner = inner.borrow();
        let Some(table) = inner.registry.get(event.event_type()) else {
            // No handlers for this event type; the event passes through unhandled.
            return;
        };
        match inner.policy {
            MatchPolicy::ExactTarget => table
                .iter()
                .find(|entry| entry.node == *event.target())
                .map(|entry| Rc::clone(&entry.handler)),
            MatchPolicy::ClosestAncestor => {
                let mut found = None;
                let mut cursor = Some(event.target().clone());
                while let Some(node) = cursor {
                    if let Some(entry) = table.iter().find(|entry| entry.node == node) {
                        found = Some(Rc::clone(&entry.handler));
                        break;
                    }
                    if inner.root.as_ref() == Some(&node) {
                        break;
                    }
                    cursor = node.parent();
                }
                found
            }
        }
    };
    match handler {
        Some(handler) => {
            tracing::trace!("Dispatching {} event to {:?}", event.event_type(), event.target());
            handler(event);
        }
        None => {
            tracing::trace!(
                "No delegated handler matched {} event on {:?}",
                event.event_type(),
                event.target()
            );
        }
    }
}
