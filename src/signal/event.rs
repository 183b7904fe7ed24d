use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::broadcast::Broadcast;
use crate::receiver::Receiver;
use crate::signal::{Signal, SignalNode};

/// Turns a stored-value signal into a pure event stream: every transaction
/// is forwarded verbatim, but the node reports no latest value and mutes its
/// own wiring, so new subscribers are never primed with a current value.
pub(crate) struct EventNode<V: Clone + 'static> {
    weak: Weak<EventNode<V>>,
    parent: Signal<V>,
    broadcast: Broadcast<V>,
    upstream: RefCell<Option<Receiver<V>>>,
}

impl<V: Clone + 'static> EventNode<V> {
    pub(crate) fn new(parent: &Signal<V>) -> Rc<Self> {
        Rc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            parent: parent.clone(),
            broadcast: Broadcast::new(),
            upstream: RefCell::new(None),
        })
    }
}

impl<V: Clone + 'static> SignalNode<V> for EventNode<V> {
    fn broadcast(&self) -> &Broadcast<V> { &self.broadcast }

    fn wire(&self) {
        // Swallow the parent's registration primer: opting out of priming is
        // this node's entire purpose.
        self.broadcast.set_muted(true);
        let weak = self.weak.clone();
        let receiver = Receiver::new(&self.parent, move |transaction| {
            if let Some(node) = weak.upgrade() {
                node.push_transaction(transaction);
            }
        });
        *self.upstream.borrow_mut() = Some(receiver);
        self.broadcast.set_muted(false);
    }
}
