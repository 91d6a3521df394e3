//! The event value handed to listeners and delegated handlers.

use std::cell::Cell;
use std::fmt;

use crate::node::Node;

/// An event traveling through the UI tree.
///
/// Carries the event type, the node the event originated on, and the two
/// propagation flags a listener may flip. The flags use interior mutability
/// so listeners can act on a shared `&Event`.
pub struct Event {
    event_type: String,
    target: Node,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    /// Create a new event of the given type, targeting `target`.
    pub fn new(event_type: impl Into<String>, target: Node) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    /// The event type, e.g. `"click"`.
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The node the event originated on.
    pub fn target(&self) -> &Node {
        &self.target
    }

    /// Stop the event from reaching any further node in the tree.
    ///
    /// Listeners already collected for the current node still run.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Whether a listener has stopped propagation.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Mark the host's default action as suppressed.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener has prevented the default action.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("target", &self.target)
            .field("propagation_stopped", &self.propagation_stopped.get())
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}
