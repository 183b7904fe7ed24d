use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::broadcast::Broadcast;
use crate::signal::{Signal, SignalNode};
use crate::transaction::LatestValue;

pub(crate) struct InputNode<V: Clone + 'static> {
    value: RefCell<V>,
    broadcast: Broadcast<V>,
    pushing: Cell<bool>,
}

impl<V: Clone + 'static> SignalNode<V> for InputNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<V> { LatestValue::Stored(self.value.borrow().clone()) }
}

/// A signal whose value is assigned by imperative code at the boundary of
/// the graph. Assignment pushes a complete `Begin` / `End` pair through all
/// observers before returning.
pub struct Input<V: Clone + 'static> {
    node: Rc<InputNode<V>>,
}

impl<V: Clone + 'static> Clone for Input<V> {
    fn clone(&self) -> Self { Self { node: self.node.clone() } }
}

impl<V: Clone + 'static> Input<V> {
    pub fn new(initial: V) -> Self {
        Self { node: Rc::new(InputNode { value: RefCell::new(initial), broadcast: Broadcast::new(), pushing: Cell::new(false) }) }
    }

    /// Assign a new value and propagate it synchronously.
    ///
    /// Panics when called from an observer that is itself reacting to this
    /// input's propagation (reentrant assignment is a programmer error).
    /// Assigning *other* inputs from observers is fine and nests an
    /// independent transaction.
    pub fn set(&self, value: V) {
        assert!(!self.node.pushing.get(), "reentrant assignment to an input during its own propagation");
        *self.node.value.borrow_mut() = value.clone();
        debug!("input assignment, beginning push");
        self.node.pushing.set(true);
        self.node.push_value(value);
        self.node.pushing.set(false);
    }

    /// Apply `f` to the current value and propagate the result.
    pub fn modify(&self, f: impl FnOnce(&mut V)) {
        let mut next = self.node.value.borrow().clone();
        f(&mut next);
        self.set(next);
    }

    /// A clone of the current value.
    pub fn value(&self) -> V { self.node.value.borrow().clone() }

    /// The erased signal handle for this input.
    pub fn signal(&self) -> Signal<V> { Signal::from_node(self.node.clone()) }
}
