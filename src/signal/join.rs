use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};
use crate::transaction::{LatestValue, Transaction};

/// Monadic flattening of a signal of signals.
///
/// Each settled inner signal replaces the previous inner subscription; the
/// inner's transactions forward verbatim, while the outer's `Begin`/`Cancel`
/// phases do not. Switching inners during a live outer transaction emits
/// nothing (the new inner's registration primer is swallowed); downstream
/// observers keep seeing values only when the current inner changes.
pub(crate) struct JoinNode<V: Clone + 'static> {
    weak: Weak<JoinNode<V>>,
    outer: Signal<Signal<V>>,
    inner: RefCell<Option<(Signal<V>, Receiver<V>)>>,
    outer_sub: RefCell<Option<Receiver<Signal<V>>>>,
    wiring: Cell<bool>,
    broadcast: Broadcast<V>,
}

impl<V: Clone + 'static> JoinNode<V> {
    pub(crate) fn new(outer: &Signal<Signal<V>>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            outer: outer.clone(),
            inner: RefCell::new(None),
            outer_sub: RefCell::new(None),
            wiring: Cell::new(false),
            broadcast: Broadcast::new(),
        })
    }

    fn switch_to(&self, inner: Signal<V>) {
        // Cancel the previous inner subscription before the new one attaches.
        self.inner.borrow_mut().take();

        let mute = !self.wiring.get() && !self.broadcast.is_muted();
        if mute {
            self.broadcast.set_muted(true);
        }
        let weak = self.weak.clone();
        let receiver = Receiver::new(&inner, move |transaction| {
            if let Some(node) = weak.upgrade() {
                node.push_transaction(transaction);
            }
        });
        if mute {
            self.broadcast.set_muted(false);
        }
        *self.inner.borrow_mut() = Some((inner, receiver));
    }
}

impl<V: Clone + 'static> SignalNode<V> for JoinNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn latest_value(&self) -> LatestValue<V> {
        match self.inner.borrow().as_ref() {
            Some((inner, _)) => inner.latest_value(),
            None => LatestValue::None,
        }
    }

    fn wire(&self) {
        self.wiring.set(true);
        let weak = self.weak.clone();
        let receiver = Receiver::new(&self.outer, move |transaction| {
            if let Some(node) = weak.upgrade() {
                if let Transaction::End(inner) = transaction {
                    node.switch_to(inner.clone());
                }
            }
        });
        *self.outer_sub.borrow_mut() = Some(receiver);
        self.wiring.set(false);
    }
}

impl<V: Clone + 'static> Signal<Signal<V>> {
    /// Flatten a signal of signals into the currently-active inner signal.
    pub fn join(&self) -> Signal<V> { Signal::from_node(JoinNode::new(self)) }
}
